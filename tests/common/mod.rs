#![allow(dead_code)]

use std::fs;
use std::path::Path;

use git2::{Oid, Repository, Signature};
use tempfile::TempDir;

/// Throwaway git repository built with libgit2.
pub struct Fixture {
    dir: TempDir,
    repo: Repository,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");

        {
            let mut config = repo.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }

        Fixture { dir, repo }
    }

    /// Repository with a single commit tagged `tag`.
    pub fn with_tag(tag: &str) -> Self {
        let fixture = Self::new();
        fixture.commit_and_tag(tag);
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    fn signature(&self) -> Signature<'static> {
        Signature::now("Test User", "test@example.com").expect("Could not build signature")
    }

    /// Write `file_name`, stage it and commit it on HEAD.
    pub fn commit(&self, file_name: &str) -> Oid {
        self.stage(file_name);

        let mut index = self.repo.index().expect("Could not get index");
        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = self.repo.find_tree(tree_id).expect("Could not find tree");

        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        let sig = self.signature();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, "Dummy", &tree, &parents)
            .expect("Could not create commit")
    }

    /// Lightweight tag on HEAD.
    pub fn tag(&self, tag: &str) {
        let head = self.head_commit();
        self.repo
            .tag_lightweight(tag, head.as_object(), false)
            .expect("Could not create tag");
    }

    /// Annotated tag on HEAD.
    pub fn annotated_tag(&self, tag: &str) {
        let head = self.head_commit();
        self.repo
            .tag(tag, head.as_object(), &self.signature(), "release", false)
            .expect("Could not create annotated tag");
    }

    pub fn commit_and_tag(&self, tag: &str) -> Oid {
        let oid = self.commit(tag);
        self.tag(tag);
        oid
    }

    /// Write `file_name` and add it to the index without committing.
    pub fn stage(&self, file_name: &str) {
        fs::write(self.path().join(file_name), "Dummy content").expect("Could not write file");
        let mut index = self.repo.index().expect("Could not get index");
        index
            .add_path(Path::new(file_name))
            .expect("Could not add file to index");
        index.write().expect("Could not write index");
    }

    /// Modify an already committed file in the working tree only.
    pub fn modify(&self, file_name: &str) {
        fs::write(self.path().join(file_name), "Changed content").expect("Could not write file");
    }

    pub fn write_untracked(&self, file_name: &str) {
        fs::write(self.path().join(file_name), "Dummy content").expect("Could not write file");
    }

    fn head_commit(&self) -> git2::Commit<'_> {
        self.repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .expect("HEAD has no commit")
    }
}

pub fn assert_matches(actual: &str, pattern: &str) {
    let re = regex::Regex::new(pattern).expect("test pattern is a valid regex");
    assert!(
        re.is_match(actual),
        "'{}' should match /{}/",
        actual,
        pattern
    );
}
