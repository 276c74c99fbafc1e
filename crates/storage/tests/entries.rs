use std::time::Instant;

use model::Coordinate;
use storage::{FileStore, StorageConfig};
use tracker::{
    map::RecordingMap, store::EntryStore, AppController, AppEvent, EntryForm, TrackerConfig,
};

fn open(dir: &std::path::Path) -> FileStore {
    FileStore::open(StorageConfig {
        data_dir: dir.to_path_buf(),
    })
    .unwrap()
}

#[test]
fn entries_persist_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let config = TrackerConfig::default();

    let mut app = AppController::new(config.clone(), open(dir.path()), RecordingMap::new());
    app.start_spot().unwrap();
    app.on_map_click(Coordinate::new(28.6129, 77.2295).unwrap())
        .unwrap();
    let spot = match app
        .submit_form(EntryForm {
            title: Some("India Gate".to_owned()),
            ..Default::default()
        })
        .unwrap()
    {
        AppEvent::EntryAdded(id) => id,
        other => panic!("unexpected event {:?}", other),
    };
    app.select_entry(&spot, Instant::now()).unwrap();
    drop(app);

    let app = AppController::new(config.clone(), open(dir.path()), RecordingMap::new());
    assert_eq!(app.store().len(), 1);
    assert_eq!(app.store().get(&spot).unwrap().title(), "India Gate");
    // selection is never persisted
    assert_eq!(app.selected_id(), None);

    let reloaded = EntryStore::load(&open(dir.path()), &config.storage_key);
    assert_eq!(reloaded.len(), 1);
}
