//! End-to-end generation scenarios against a temporary output directory.

use labuser_playbook::{unwrap_document, PlaybookBuilder, PlaybookSettings};
use labuser_provision::{FsPipeline, FsPlaybookStore, Handoff, ProvisioningPipeline};
use labuser_secrets::BcryptHasher;
use labuser_types::{
    Credential, CredentialHasher, LabUserError, PlaybookStore, ProvisioningRequest, PublicKey,
    Result, Username,
};
use std::path::PathBuf;
use tempfile::TempDir;

const KEY: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIOMqqnkVzrm0SdG6UOoqKLsabgH5C9okWi0dh2l9GKJl bob@laptop";

struct Fixture {
    _temp: TempDir,
    out: PathBuf,
    handoff: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("ansible").join("users");
        let handoff = temp.path().join("handoff.txt");
        Self { _temp: temp, out, handoff }
    }

    fn pipeline(&self) -> FsPipeline {
        FsPipeline::standard(
            4,
            FsPlaybookStore::new(&self.out),
            PlaybookSettings::default(),
            Handoff::new(&self.handoff),
        )
    }

    fn read(&self, file_name: &str) -> String {
        std::fs::read_to_string(self.out.join(file_name)).unwrap()
    }
}

fn add_bob() -> ProvisioningRequest {
    ProvisioningRequest::add(
        Username::new("bob").unwrap(),
        "S3cret!",
        PublicKey::new(KEY).unwrap(),
    )
}

fn body_of(text: &str) -> serde_yaml::Value {
    serde_yaml::from_str(&unwrap_document(text).unwrap()).unwrap()
}

#[test]
fn add_writes_playbook_and_handoff() {
    let fx = Fixture::new();

    let result = fx.pipeline().execute(add_bob()).unwrap();
    assert_eq!(result.file_name, "bob.yml");
    assert_eq!(result.path, fx.out.join("bob.yml"));

    let text = fx.read("bob.yml");
    assert!(text.starts_with(
        "---\n\n- name: Create new user with password and SSH key on Linux Support Lab hosts\n"
    ));

    let body = body_of(&text);
    assert_eq!(body["hosts"].as_str(), Some("all"));
    assert_eq!(body["become"].as_bool(), Some(true));
    assert_eq!(body["vars"].as_mapping().unwrap().len(), 3);
    assert_eq!(body["vars"]["new_username"].as_str(), Some("bob"));
    assert_eq!(body["vars"]["users_public_ssh_key"].as_str(), Some(KEY));

    let names: Vec<&str> = body["tasks"]
        .as_sequence()
        .unwrap()
        .iter()
        .map(|task| task["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "Create new user",
            "Ensure .ssh directory exists",
            "Set authorized key for SSH access using shell command",
        ]
    );

    assert_eq!(std::fs::read_to_string(&fx.handoff).unwrap(), "bob.yml");
}

#[test]
fn add_stores_a_verifiable_hash_only() {
    let fx = Fixture::new();
    fx.pipeline().execute(add_bob()).unwrap();

    let text = fx.read("bob.yml");
    assert!(!text.contains("S3cret!"));

    let hash = body_of(&text)["vars"]["new_user_password"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(hash.starts_with("$2b$04$"));
    assert!(BcryptHasher::new(4).verify("S3cret!", &hash).unwrap());
}

#[test]
fn remove_writes_two_steps() {
    let fx = Fixture::new();

    let result = fx
        .pipeline()
        .execute(ProvisioningRequest::remove(Username::new("bob").unwrap()))
        .unwrap();
    assert_eq!(result.file_name, "remove_bob.yml");

    let text = fx.read("remove_bob.yml");
    assert!(text.starts_with(
        "---\n\n- name: Remove user and home directory from Linux Support Lab hosts\n"
    ));

    let body = body_of(&text);
    assert_eq!(body["vars"]["username"].as_str(), Some("bob"));
    assert_eq!(body["tasks"].as_sequence().unwrap().len(), 2);
    assert_eq!(std::fs::read_to_string(&fx.handoff).unwrap(), "remove_bob.yml");
}

#[test]
fn remove_is_repeatable() {
    let fx = Fixture::new();
    let pipeline = fx.pipeline();
    let bob = Username::new("bob").unwrap();

    pipeline.execute(ProvisioningRequest::remove(bob.clone())).unwrap();
    pipeline.execute(ProvisioningRequest::remove(bob)).unwrap();

    assert_eq!(body_of(&fx.read("remove_bob.yml"))["tasks"].as_sequence().unwrap().len(), 2);
}

#[test]
fn duplicate_add_is_rejected_without_touching_anything() {
    let fx = Fixture::new();
    let pipeline = fx.pipeline();

    pipeline.execute(add_bob()).unwrap();
    let first = fx.read("bob.yml");
    std::fs::write(&fx.handoff, "previous.yml").unwrap();

    let err = pipeline.execute(add_bob()).unwrap_err();
    assert!(matches!(err, LabUserError::DuplicateIdentity(ref name) if name == "bob"));
    assert!(err.to_string().contains("already exists"));

    assert_eq!(fx.read("bob.yml"), first);
    assert_eq!(std::fs::read_to_string(&fx.handoff).unwrap(), "previous.yml");
}

#[test]
fn remove_after_add_leaves_add_playbook() {
    let fx = Fixture::new();
    let pipeline = fx.pipeline();

    pipeline.execute(add_bob()).unwrap();
    pipeline
        .execute(ProvisioningRequest::remove(Username::new("bob").unwrap()))
        .unwrap();

    assert!(fx.out.join("bob.yml").exists());
    assert!(fx.out.join("remove_bob.yml").exists());
}

struct BrokenHasher;

impl CredentialHasher for BrokenHasher {
    fn hash(&self, _secret: &str) -> Result<Credential> {
        Err(LabUserError::HashingUnavailable("entropy source offline".to_string()))
    }

    fn verify(&self, _secret: &str, _hash: &str) -> Result<bool> {
        Ok(false)
    }

    fn scheme(&self) -> &'static str {
        "broken"
    }
}

#[test]
fn hashing_failure_writes_nothing() {
    let fx = Fixture::new();
    let pipeline = ProvisioningPipeline::new(
        BrokenHasher,
        FsPlaybookStore::new(&fx.out),
        PlaybookBuilder::default(),
        Handoff::new(&fx.handoff),
    );

    let err = pipeline.execute(add_bob()).unwrap_err();
    assert!(matches!(err, LabUserError::HashingUnavailable(_)));
    assert!(!fx.out.join("bob.yml").exists());
    assert!(!fx.handoff.exists());
}

struct ReadOnlyStore(PathBuf);

impl PlaybookStore for ReadOnlyStore {
    fn exists(&self, _file_name: &str) -> Result<bool> {
        Ok(false)
    }

    fn write(&self, file_name: &str, _contents: &str) -> Result<PathBuf> {
        Err(LabUserError::write(self.0.join(file_name), "Read-only file system"))
    }

    fn remove(&self, _file_name: &str) -> Result<()> {
        Ok(())
    }
}

#[test]
fn write_failure_skips_handoff() {
    let fx = Fixture::new();
    let pipeline = ProvisioningPipeline::new(
        BcryptHasher::new(4),
        ReadOnlyStore(fx.out.clone()),
        PlaybookBuilder::default(),
        Handoff::new(&fx.handoff),
    );

    let err = pipeline.execute(add_bob()).unwrap_err();
    assert!(matches!(err, LabUserError::Write { .. }));
    assert!(!fx.handoff.exists());
}

#[test]
fn handoff_failure_removes_playbook_and_allows_retry() {
    let fx = Fixture::new();
    let broken = FsPipeline::standard(
        4,
        FsPlaybookStore::new(&fx.out),
        PlaybookSettings::default(),
        Handoff::new(fx.handoff.with_file_name("missing").join("handoff.txt")),
    );

    let err = broken.execute(add_bob()).unwrap_err();
    assert!(matches!(err, LabUserError::Write { .. }));
    assert!(!fx.out.join("bob.yml").exists());

    let result = fx.pipeline().execute(add_bob()).unwrap();
    assert_eq!(result.file_name, "bob.yml");
    assert!(fx.out.join("bob.yml").exists());
    assert_eq!(std::fs::read_to_string(&fx.handoff).unwrap(), "bob.yml");
}

#[test]
fn invalid_hasher_cost_is_reported() {
    let fx = Fixture::new();
    let pipeline = FsPipeline::standard(
        99,
        FsPlaybookStore::new(&fx.out),
        PlaybookSettings::default(),
        Handoff::new(&fx.handoff),
    );

    assert!(matches!(
        pipeline.execute(add_bob()),
        Err(LabUserError::HashingUnavailable(_))
    ));
    assert!(!fx.handoff.exists());
}
