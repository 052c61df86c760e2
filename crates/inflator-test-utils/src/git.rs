//! Local git repositories usable as clone sources.
//!
//! Everything is built through `git2`, so no `git` binary or network access
//! is required.

use std::fs;
use std::path::Path;

use git2::{Commit, Repository, Signature};

/// One commit in a fixture history.
pub struct FixtureCommit<'a> {
    /// Files written (relative path, content) before committing
    pub files: &'a [(&'a str, &'a str)],
    /// Lightweight tag pointing at the commit, if any
    pub tag: Option<&'a str>,
}

/// Initialise a repository at `path` and replay `history` onto its default
/// branch, oldest first.
///
/// # Panics
/// Panics if any git or filesystem operation fails.
pub fn repo_with_history(path: &Path, history: &[FixtureCommit<'_>]) -> Repository {
    let repo = Repository::init(path).unwrap_or_else(|e| {
        panic!(
            "repo_with_history: failed to init repository at {}: {e}",
            path.display()
        )
    });

    for (idx, commit) in history.iter().enumerate() {
        let oid = commit_files(&repo, commit.files, &format!("commit {idx}"));
        if let Some(tag) = commit.tag {
            let object = repo.find_object(oid, None).unwrap();
            repo.tag_lightweight(tag, &object, false)
                .unwrap_or_else(|e| panic!("repo_with_history: failed to tag {tag}: {e}"));
        }
    }

    repo
}

/// Write `files` into the work tree of `repo` and commit them on HEAD.
///
/// # Panics
/// Panics if any git or filesystem operation fails.
pub fn commit_files(repo: &Repository, files: &[(&str, &str)], message: &str) -> git2::Oid {
    let workdir = repo
        .workdir()
        .expect("commit_files: repository has no work tree")
        .to_path_buf();

    let mut index = repo.index().unwrap();
    for (name, content) in files {
        let full = workdir.join(name);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full, content)
            .unwrap_or_else(|e| panic!("commit_files: failed to write {name}: {e}"));
        index.add_path(Path::new(name)).unwrap();
    }
    index.write().unwrap();

    let tree_id = index.write_tree().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let signature = Signature::now("Test User", "test@example.com").unwrap();

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&Commit<'_>> = parent.iter().collect();

    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap_or_else(|e| panic!("commit_files: commit failed: {e}"))
}
