use std::{env, error::Error, time::Duration};

use model::{record, Coordinate, LogEntry};
use storage::{FileStore, StorageConfig};
use tracker::{
    event::{AppHandle, UiEvent},
    geolocation::{FixedPosition, GeolocationError},
    map::RecordingMap,
    AppController, AppEvent, EntryForm, TrackerConfig,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    if env::args().nth(1).as_deref() == Some("schema") {
        println!("{}", serde_json::to_string_pretty(&record::schema())?);
        return Ok(());
    }

    let config = TrackerConfig::from_env();
    let storage = FileStore::open(StorageConfig::from_env())?;
    log::info!("storing entries under {}", storage.dir().display());

    let mut controller = AppController::new(config, storage, RecordingMap::new());
    let center = controller.initialize_view(&FixedPosition(Err(GeolocationError::Unavailable)));
    log::info!("map centered on {:?}", center);

    let app = AppHandle::run(controller);

    // a short loop around the center, closed by returning to the start
    app.send(UiEvent::StartRoute).await?;
    for (dlat, dlng) in [(0.0, 0.0), (0.004, 0.0), (0.004, 0.005), (0.0, 0.005), (0.0001, 0.0001)] {
        let point = Coordinate::new(center.latitude + dlat, center.longitude + dlng)?;
        match app.send(UiEvent::MapClick(point)).await? {
            AppEvent::Drawing {
                points,
                live_distance_km,
            } => println!("{} points, {:.2} km", points, live_distance_km),
            other => println!("{:?}", other),
        }
    }
    let route = match app
        .send(UiEvent::SubmitForm(EntryForm {
            title: Some("Evening loop".to_owned()),
            duration_min: Some(12),
            notes: None,
        }))
        .await?
    {
        AppEvent::EntryAdded(id) => id,
        other => return Err(format!("unexpected event {:?}", other).into()),
    };

    app.send(UiEvent::HoverEntry(route.clone())).await?;
    tokio::time::sleep(Duration::from_millis(300)).await;
    println!("hover: {:?}", app.phase_of(route.clone()).await?);
    app.send(UiEvent::UnhoverEntry(route.clone())).await?;

    app.send(UiEvent::SelectEntry(route.clone())).await?;
    tokio::time::sleep(Duration::from_millis(2500)).await;
    println!("selected: {:?}", app.phase_of(route.clone()).await?);

    for entry in app.entries().await? {
        print_entry(&entry);
    }

    app.send(UiEvent::DeleteConfirmed(route)).await?;
    app.stop_frames();
    println!("{} entries left", app.entries().await?.len());
    Ok(())
}

fn print_entry(entry: &LogEntry) {
    println!("{} {} ({})", entry.formatted_date(), entry.title(), entry.kind());
    if let Some(route) = entry.as_route() {
        println!(
            "  {}, {}, {}",
            route.formatted_distance(),
            route.formatted_duration(),
            route.formatted_pace()
        );
    }
}
