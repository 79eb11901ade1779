//! Backend tests against real repositories created in temporary directories

use std::path::Path;
use std::time::Duration;

use git2::{Oid, Repository as RawRepo, Signature};
use tag_publish::git::{FetchOutcome, Git2Repository, Repository, TagBackend};
use tag_publish::{ResolveStrategy, TagResolver};
use tempfile::TempDir;

/// Commit an empty tree, updating `refname` when given
fn commit(repo: &RawRepo, refname: Option<&str>, message: &str, parents: &[Oid]) -> Oid {
    let sig = Signature::now("Test User", "test@example.com").unwrap();
    let tree_id = repo.treebuilder(None).unwrap().write().unwrap();
    let tree = repo.find_tree(tree_id).unwrap();
    let parents: Vec<git2::Commit> = parents
        .iter()
        .map(|oid| repo.find_commit(*oid).unwrap())
        .collect();
    let parent_refs: Vec<&git2::Commit> = parents.iter().collect();
    repo.commit(refname, &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}

fn tag(repo: &RawRepo, name: &str, target: Oid) {
    let object = repo.find_object(target, None).unwrap();
    repo.tag_lightweight(name, &object, false).unwrap();
}

fn annotated_tag(repo: &RawRepo, name: &str, target: Oid) {
    let sig = Signature::now("Test User", "test@example.com").unwrap();
    let object = repo.find_object(target, None).unwrap();
    repo.tag(name, &object, &sig, "release", false).unwrap();
}

struct Fixture {
    dir: TempDir,
    main: Vec<Oid>,
    gray: Vec<Oid>,
}

impl Fixture {
    fn raw(&self) -> RawRepo {
        RawRepo::open(self.dir.path()).unwrap()
    }

    fn backend(&self) -> Git2Repository {
        Git2Repository::open(self.dir.path()).unwrap()
    }
}

/// `main` has three commits; `gray` forks from the second one
fn forked_fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let repo = RawRepo::init(dir.path()).unwrap();

    let m1 = commit(&repo, Some("refs/heads/main"), "m1", &[]);
    let m2 = commit(&repo, Some("refs/heads/main"), "m2", &[m1]);
    let m3 = commit(&repo, Some("refs/heads/main"), "m3", &[m2]);
    repo.reference("refs/heads/gray", m2, true, "fork gray").unwrap();
    let g1 = commit(&repo, Some("refs/heads/gray"), "g1", &[m2]);
    let g2 = commit(&repo, Some("refs/heads/gray"), "g2", &[g1]);

    Fixture {
        dir,
        main: vec![m1, m2, m3],
        gray: vec![g1, g2],
    }
}

#[test]
fn test_branches_and_commits_resolve() {
    let fixture = forked_fixture();
    let backend = fixture.backend();

    let mut branches = backend.local_branches().unwrap();
    branches.sort();
    assert_eq!(branches, vec!["gray", "main"]);
    assert!(backend.remote_branches().unwrap().is_empty());

    assert_eq!(backend.resolve_commit("main").unwrap(), Some(fixture.main[2]));
    assert_eq!(backend.resolve_commit("gray").unwrap(), Some(fixture.gray[1]));
    assert_eq!(backend.resolve_commit("missing").unwrap(), None);
}

#[test]
fn test_ancestry_follows_graph() {
    let fixture = forked_fixture();
    let backend = fixture.backend();

    assert!(backend.is_ancestor(fixture.main[0], fixture.main[2]).unwrap());
    assert!(backend.is_ancestor(fixture.main[1], fixture.gray[1]).unwrap());
    assert!(backend.is_ancestor(fixture.main[2], fixture.main[2]).unwrap());
    assert!(!backend.is_ancestor(fixture.main[2], fixture.gray[1]).unwrap());
    assert!(!backend.is_ancestor(fixture.gray[0], fixture.main[2]).unwrap());
}

#[test]
fn test_list_tags_highest_first() {
    let fixture = forked_fixture();
    let raw = fixture.raw();
    tag(&raw, "g1.9.9", fixture.gray[0]);
    tag(&raw, "g1.9.10", fixture.gray[1]);
    tag(&raw, "g1.10.0", fixture.gray[1]);
    tag(&raw, "v1.0.0", fixture.main[0]);

    let backend = fixture.backend();
    assert!(backend.has_tags().unwrap());
    assert!(backend.tag_exists("g1.9.9").unwrap());
    assert!(!backend.tag_exists("g1.9.8").unwrap());
    assert_eq!(
        backend.list_tags("g*").unwrap(),
        vec!["g1.10.0", "g1.9.10", "g1.9.9"]
    );
}

#[test]
fn test_annotated_tags_peel_to_commit() {
    let fixture = forked_fixture();
    annotated_tag(&fixture.raw(), "v2.0.0", fixture.main[1]);

    let backend = fixture.backend();
    assert_eq!(
        backend.resolve_commit("v2.0.0").unwrap(),
        Some(fixture.main[1])
    );
}

#[test]
fn test_resolver_picks_last_tag_of_each_branch() {
    let fixture = forked_fixture();
    let raw = fixture.raw();
    tag(&raw, "v1.0.0", fixture.main[0]);
    tag(&raw, "v1.0.1", fixture.main[2]);
    tag(&raw, "g1.9.9", fixture.gray[0]);
    // Higher gray-style tag that is not on gray
    tag(&raw, "g1.9.10", fixture.main[2]);

    let backend = fixture.backend();
    let resolver = TagResolver::new(&backend, "origin");
    assert_eq!(
        resolver.resolve_last("main", "v0.0.0").as_deref(),
        Some("v1.0.1")
    );
    assert_eq!(
        resolver.resolve_last("gray", "g0.0.0").as_deref(),
        Some("g1.9.9")
    );
    // v1.0.0 is on gray through the shared first commit
    assert_eq!(
        resolver.resolve_last("gray", "v0.0.0").as_deref(),
        Some("v1.0.0")
    );

    let highest = TagResolver::new(&backend, "origin").with_strategy(ResolveStrategy::Highest);
    assert_eq!(
        highest.resolve_last("main", "g0.0.0").as_deref(),
        Some("g1.9.10")
    );
}

#[test]
fn test_resolver_without_tags() {
    let fixture = forked_fixture();
    let backend = fixture.backend();
    let resolver = TagResolver::new(&backend, "origin");
    assert_eq!(resolver.resolve_last("main", "v0.0.0"), None);
}

#[test]
fn test_remote_tracking_branch_fallback() {
    let fixture = forked_fixture();
    let raw = fixture.raw();
    let r1 = commit(&raw, Some("refs/remotes/origin/release"), "r1", &[fixture.main[2]]);
    tag(&raw, "r1.0.0", r1);

    let backend = fixture.backend();
    assert_eq!(backend.remote_branches().unwrap(), vec!["origin/release"]);

    let resolver = TagResolver::new(&backend, "origin");
    assert_eq!(
        resolver.resolve_last("release", "r0.0.0").as_deref(),
        Some("r1.0.0")
    );
}

#[test]
fn test_create_tag() {
    let fixture = forked_fixture();
    let backend = fixture.backend();

    backend.create_tag("v0.0.1", fixture.main[2]).unwrap();
    assert!(backend.tag_exists("v0.0.1").unwrap());
    assert_eq!(
        backend.resolve_commit("v0.0.1").unwrap(),
        Some(fixture.main[2])
    );

    // Tags are never moved
    assert!(backend.create_tag("v0.0.1", fixture.main[0]).is_err());
}

/// A work repository with a bare `origin` holding the fixture's branches
fn with_origin(fixture: &Fixture) -> (TempDir, Git2Repository) {
    let origin_dir = tempfile::tempdir().unwrap();
    RawRepo::init_bare(origin_dir.path()).unwrap();

    let raw = fixture.raw();
    raw.remote("origin", path_str(origin_dir.path())).unwrap();
    let mut remote = raw.find_remote("origin").unwrap();
    remote
        .push(&["refs/heads/main:refs/heads/main", "refs/heads/gray:refs/heads/gray"], None)
        .unwrap();

    (origin_dir, fixture.backend())
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_remotes_origin_first() {
    let fixture = forked_fixture();
    let raw = fixture.raw();
    raw.remote("backup", "https://example.com/backup.git").unwrap();
    raw.remote("origin", "https://example.com/origin.git").unwrap();
    raw.remote("alpha", "https://example.com/alpha.git").unwrap();

    let names: Vec<String> = fixture
        .backend()
        .remotes()
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["origin", "alpha", "backup"]);
}

#[test]
fn test_fetch_populates_remote_branches() {
    let fixture = forked_fixture();
    let (_origin_dir, backend) = with_origin(&fixture);

    let outcome = backend.fetch("origin", Duration::from_secs(30)).unwrap();
    assert_eq!(outcome, FetchOutcome::Completed);

    let mut remote_branches = backend.remote_branches().unwrap();
    remote_branches.sort();
    assert_eq!(remote_branches, vec!["origin/gray", "origin/main"]);
}

/// Tag `target` directly in the bare origin, so it exists only remotely
fn tag_in_origin(origin_dir: &TempDir, name: &str, target: Oid) {
    let origin = RawRepo::open_bare(origin_dir.path()).unwrap();
    tag(&origin, name, target);
}

#[test]
fn test_fetch_brings_remote_tags_when_repository_has_tags() {
    let fixture = forked_fixture();
    tag(&fixture.raw(), "v1.0.0", fixture.main[0]);
    let (origin_dir, backend) = with_origin(&fixture);
    tag_in_origin(&origin_dir, "v2.0.0", fixture.main[2]);
    assert!(!backend.tag_exists("v2.0.0").unwrap());

    let outcome = backend.fetch("origin", Duration::from_secs(30)).unwrap();

    assert_eq!(outcome, FetchOutcome::Completed);
    assert!(backend.tag_exists("v2.0.0").unwrap());
    assert_eq!(
        backend.resolve_commit("v2.0.0").unwrap(),
        Some(fixture.main[2])
    );
}

#[test]
fn test_fetch_skips_tags_when_repository_has_none() {
    let fixture = forked_fixture();
    let (origin_dir, backend) = with_origin(&fixture);
    tag_in_origin(&origin_dir, "v2.0.0", fixture.main[2]);

    let outcome = backend.fetch("origin", Duration::from_secs(30)).unwrap();

    assert_eq!(outcome, FetchOutcome::Completed);
    assert!(!backend.has_tags().unwrap());
    assert!(!backend.tag_exists("v2.0.0").unwrap());
    assert!(!backend.remote_branches().unwrap().is_empty());
}

#[test]
fn test_push_tag_reaches_remote() {
    let fixture = forked_fixture();
    let (origin_dir, backend) = with_origin(&fixture);

    backend.create_tag("v0.1.0", fixture.main[2]).unwrap();
    backend.push_tag("origin", "v0.1.0").unwrap();

    let origin = RawRepo::open_bare(origin_dir.path()).unwrap();
    let pushed = origin
        .find_reference("refs/tags/v0.1.0")
        .unwrap()
        .peel_to_commit()
        .unwrap();
    assert_eq!(pushed.id(), fixture.main[2]);
}

#[test]
fn test_push_to_unknown_remote_fails() {
    let fixture = forked_fixture();
    let backend = fixture.backend();
    backend.create_tag("v0.1.0", fixture.main[2]).unwrap();

    let err = backend.push_tag("nowhere", "v0.1.0").unwrap_err();
    assert!(err.to_string().contains("No remote named 'nowhere'"));
}
