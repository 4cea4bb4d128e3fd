use crate::git::{CommitIds, GitError, HistoryBackend};
use crate::models::{BranchTip, CommitRecord};
use anyhow::Result;
use git2::{BranchType, Oid, Repository, RepositoryOpenFlags, Sort};
use std::path::{Path, PathBuf};

/// [`HistoryBackend`] over an on-disk repository opened through libgit2.
pub struct GitRepository {
    repo: Repository,
    path: PathBuf,
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("path", &self.path)
            .finish()
    }
}

impl GitRepository {
    /// Open the repository at exactly `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open_ext(
            path.as_ref(),
            RepositoryOpenFlags::NO_SEARCH,
            &[] as &[&std::ffi::OsStr],
        )?;
        Ok(Self::from_repository(repo))
    }

    /// Open the repository containing `path`, searching parent directories.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open_ext(
            path.as_ref(),
            RepositoryOpenFlags::empty(),
            &[] as &[&std::ffi::OsStr],
        )?;
        Ok(Self::from_repository(repo))
    }

    pub fn from_repository(repo: Repository) -> Self {
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        GitRepository { repo, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    fn parse_oid(id: &str) -> Result<Oid, GitError> {
        Oid::from_str(id).map_err(|e| GitError::lookup_failure(id, e))
    }
}

impl HistoryBackend for GitRepository {
    fn resolve_branch_head(&self, name: &str) -> Result<String, GitError> {
        let reference = self
            .repo
            .find_reference(&format!("refs/heads/{}", name))
            .map_err(|_| GitError::branch_unresolvable(name))?;

        let target = reference
            .resolve()
            .ok()
            .and_then(|resolved| resolved.target())
            .or_else(|| reference.target());

        match target {
            Some(oid) if !oid.is_zero() => Ok(oid.to_string()),
            _ => Err(GitError::branch_unresolvable(name)),
        }
    }

    fn walk_ancestry<'a>(&'a self, start: &str, limit: usize) -> Result<CommitIds<'a>, GitError> {
        let oid = Self::parse_oid(start)?;
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(oid)?;

        Ok(Box::new(revwalk.take(limit).map(|oid| {
            oid.map(|oid| oid.to_string())
                .map_err(|e| GitError::lookup_failure("revwalk", e))
        })))
    }

    fn load_commit(&self, id: &str) -> Result<CommitRecord, GitError> {
        let oid = Self::parse_oid(id)?;
        let commit = self
            .repo
            .find_commit(oid)
            .map_err(|e| GitError::lookup_failure(id, e))?;
        Ok(CommitRecord::new(&commit))
    }

    fn list_local_branches(&self) -> Result<Vec<BranchTip>, GitError> {
        let mut tips = Vec::new();

        for branch in self.repo.branches(Some(BranchType::Local))? {
            let (branch, _) = branch?;
            let Some(name) = branch.name()?.map(str::to_string) else {
                continue;
            };

            let reference = branch.get();
            let target = reference
                .resolve()
                .ok()
                .and_then(|resolved| resolved.target())
                .or_else(|| reference.target());

            if let Some(target) = target {
                tips.push(BranchTip {
                    name,
                    target: target.to_string(),
                });
            }
        }

        Ok(tips)
    }

    fn head_branch(&self) -> Option<String> {
        let head = self.repo.head().ok()?;
        if !head.is_branch() {
            return None;
        }
        head.shorthand().map(str::to_string)
    }
}
