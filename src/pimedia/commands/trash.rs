use crate::commands::helpers::{relocate, require_entry};
use crate::commands::{run_batch, BatchResult, Change};
use crate::error::{MediaError, Result};
use crate::model::RecordPatch;
use crate::paths::{breadcrumb, item_id, locate_item, Area, StorageLayout};
use crate::store::{MetadataStore, RecordBackend};
use std::fs;
use tracing::info;

/// Moves live items into the owner's trash.
///
/// Each item is renamed (never copied) to a direct child of the trash root. Its
/// record remembers the breadcrumb of the folder it left, and is re-keyed to the
/// new id along with the records of anything inside it.
pub fn run<B: RecordBackend, I: AsRef<str>>(
    layout: &StorageLayout,
    store: &MetadataStore<B>,
    owner: &str,
    ids: &[I],
) -> BatchResult {
    let result = run_batch(ids, "trash", "Moved to trash", |id| {
        trash_one(layout, store, owner, id)
    });
    info!(owner, items = result.items.len(), "trash finished");
    result
}

fn trash_one<B: RecordBackend>(
    layout: &StorageLayout,
    store: &MetadataStore<B>,
    owner: &str,
    id: &str,
) -> Result<Change> {
    let location = locate_item(layout, owner, id)?;
    if location.area == Area::Trash {
        return Err(MediaError::InvalidPath(format!("{} is already in the trash", id)));
    }
    require_entry(&location.path, id)?;

    let parent = location
        .path
        .parent()
        .ok_or_else(|| MediaError::InvalidPath(id.to_string()))?;
    let original_path = breadcrumb(layout, owner, parent)?;
    let name = location
        .path
        .file_name()
        .ok_or_else(|| MediaError::InvalidPath(id.to_string()))?;

    let trash = layout.owner_trash(owner)?;
    fs::create_dir_all(&trash).map_err(MediaError::Io)?;
    let destination = trash.join(name);
    let new_id = item_id(layout, owner, &destination)?;

    let patch = RecordPatch::new(new_id.clone(), owner).trashed(original_path.clone());
    relocate(store, owner, id, &location.path, &destination, &patch)?;

    Ok(Change::Trashed {
        new_id,
        original_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::list;
    use crate::test_utils::TestEnv;

    #[test]
    fn moves_file_into_trash_and_records_origin() {
        let env = TestEnv::new();
        env.write_file("alice", "Trip/beach.jpg", b"sand");

        let result = run(&env.layout, &env.store, "alice", &["Trip/beach.jpg"]);
        assert!(!result.has_failures());
        assert_eq!(
            result.outcome("Trip/beach.jpg").unwrap().as_ref().unwrap(),
            &Change::Trashed {
                new_id: "../.trash/alice/beach.jpg".to_string(),
                original_path: "My Files/Trip".to_string(),
            }
        );

        assert!(!env.live_path("alice", "Trip/beach.jpg").exists());
        assert!(env.trash_path("alice", "beach.jpg").exists());

        let record = env
            .store
            .find("../.trash/alice/beach.jpg", "alice")
            .unwrap();
        assert!(record.is_trashed);
        assert_eq!(record.original_path.as_deref(), Some("My Files/Trip"));
    }

    #[test]
    fn keeps_favorite_flag_of_existing_record() {
        let env = TestEnv::new();
        env.write_file("alice", "a.jpg", b"x");
        env.store
            .upsert(&[RecordPatch::new("a.jpg", "alice").favorite(true)])
            .unwrap();

        run(&env.layout, &env.store, "alice", &["a.jpg"]);

        assert!(env.store.find("a.jpg", "alice").is_none());
        let record = env.store.find("../.trash/alice/a.jpg", "alice").unwrap();
        assert!(record.is_favorite);
        assert_eq!(env.store.load_all().len(), 1);
    }

    #[test]
    fn trashed_folder_is_one_item() {
        let env = TestEnv::new();
        env.write_file("alice", "Trip/a.jpg", b"x");
        env.write_file("alice", "Trip/b.jpg", b"x");

        run(&env.layout, &env.store, "alice", &["Trip"]);

        let items = list(&env.layout, &env.store, "alice").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "../.trash/alice/Trip");
        assert_eq!(items[0].original_logical_path.as_deref(), Some("My Files"));
        assert!(env.trash_path("alice", "Trip/b.jpg").exists());
    }

    #[test]
    fn missing_and_invalid_ids_fail_per_item() {
        let env = TestEnv::new();
        env.write_file("alice", "a.jpg", b"x");

        let result = run(
            &env.layout,
            &env.store,
            "alice",
            &["ghost.jpg", "../bob/x.jpg", "a.jpg"],
        );
        assert!(matches!(
            result.outcome("ghost.jpg"),
            Some(Err(MediaError::NotFound(_)))
        ));
        assert!(matches!(
            result.outcome("../bob/x.jpg"),
            Some(Err(MediaError::InvalidPath(_)))
        ));
        assert!(result.outcome("a.jpg").unwrap().is_ok());
    }

    #[test]
    fn name_collision_in_trash_is_refused() {
        let env = TestEnv::new();
        env.write_file("alice", "One/a.jpg", b"first");
        env.write_file("alice", "Two/a.jpg", b"second");

        run(&env.layout, &env.store, "alice", &["One/a.jpg"]);
        let result = run(&env.layout, &env.store, "alice", &["Two/a.jpg"]);

        assert!(matches!(
            result.outcome("Two/a.jpg"),
            Some(Err(MediaError::AlreadyExists(_)))
        ));
        assert!(env.live_path("alice", "Two/a.jpg").exists());
        assert_eq!(
            fs::read(env.trash_path("alice", "a.jpg")).unwrap(),
            b"first"
        );
    }

    #[test]
    fn trashing_a_trashed_item_is_refused() {
        let env = TestEnv::new();
        env.write_file("alice", "a.jpg", b"x");
        run(&env.layout, &env.store, "alice", &["a.jpg"]);
        let result = run(&env.layout, &env.store, "alice", &["../.trash/alice/a.jpg"]);
        assert!(matches!(
            result.outcome("../.trash/alice/a.jpg"),
            Some(Err(MediaError::InvalidPath(_)))
        ));
    }
}
