use chrono::Local;
use fruit_core::api::Prediction;
use fruit_core::{
    CardLabels, ClassifierApi, ClassifierError, HISTORY_CAPACITY, Notify, PredictionFollowUp,
    PredictionResponse, SelectedImage, Session, StatsPoller, StatsSnapshot, Tab, UiError,
    WorkerMessage, export_result_card, export_result_json, spawn_prediction,
};
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Duration;

#[derive(Default)]
struct CountingApi {
    predictions: AtomicUsize,
    stats: AtomicUsize,
}

impl ClassifierApi for CountingApi {
    fn predict(&self, _image: &SelectedImage) -> Result<PredictionResponse, ClassifierError> {
        self.predictions.fetch_add(1, Ordering::SeqCst);
        Ok(PredictionResponse {
            prediction: Prediction {
                fruit: "Banana".into(),
                confidence: 0.873,
                ..Default::default()
            },
            processing_time: "123ms".into(),
            ..Default::default()
        })
    }

    fn fetch_stats(&self) -> Result<StatsSnapshot, ClassifierError> {
        let n = self.stats.fetch_add(1, Ordering::SeqCst) as u64;
        Ok(StatsSnapshot {
            total_predictions: n,
            ..Default::default()
        })
    }
}

fn png() -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(10, 10, image::Rgba([250, 220, 0, 255]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

#[test]
fn submit_without_file_never_reaches_the_service() {
    let api = CountingApi::default();
    let mut session = Session::new();

    if let Some(image) = session.begin_prediction() {
        let _ = api.predict(&image);
    }

    assert_eq!(api.predictions.load(Ordering::SeqCst), 0);
    assert_eq!(session.error(), Some(&UiError::MissingFile));
}

#[test]
fn full_prediction_round_trip() {
    let api = Arc::new(CountingApi::default());
    let (tx, rx) = mpsc::channel();
    let notify: Notify = Arc::new(|| {});
    let poller = StatsPoller::spawn(
        api.clone(),
        Duration::from_secs(3600),
        tx.clone(),
        notify.clone(),
    );

    let mut session = Session::new();
    match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
        WorkerMessage::Stats(stats) => session.set_stats(stats),
        other => panic!("expected stats, got {other:?}"),
    }

    session.select(SelectedImage::from_bytes("banana.png", png(), None));
    let image = session.begin_prediction().unwrap();
    spawn_prediction(api.clone(), image, tx, notify).join().unwrap();

    let outcome = match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
        WorkerMessage::Prediction(outcome) => outcome,
        other => panic!("expected prediction, got {other:?}"),
    };
    if session.finish_prediction(outcome, Local::now()) == PredictionFollowUp::RefreshStats {
        poller.refresh_now();
    }
    match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
        WorkerMessage::Stats(stats) => session.set_stats(stats),
        other => panic!("expected stats, got {other:?}"),
    }

    assert_eq!(session.stats().map(|s| s.total_predictions), Some(1));
    assert_eq!(session.history().len(), 1);
    assert_eq!(
        fruit_core::format_percent(session.result().unwrap().prediction.confidence),
        "87.3%"
    );
    assert_eq!(session.result().unwrap().processing_time, "123ms");

    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("r.json");
    let card = dir.path().join("r.png");
    assert!(export_result_json(session.result(), &json).unwrap());
    assert!(
        export_result_card(
            session.result(),
            session.selected().map(SelectedImage::preview),
            &CardLabels::default(),
            &card
        )
        .unwrap()
    );
    assert!(json.exists() && card.exists());

    session.set_tab(Tab::History);
    session.reset();
    assert!(!export_result_json(session.result(), dir.path().join("none.json")).unwrap());
    assert!(!dir.path().join("none.json").exists());
}

#[test]
fn repeated_predictions_keep_history_bounded() {
    let api = CountingApi::default();
    let mut session = Session::new();
    session.select(SelectedImage::from_bytes("banana.png", png(), None));
    for _ in 0..(HISTORY_CAPACITY * 2) {
        let image = session.begin_prediction().unwrap();
        session.finish_prediction(api.predict(&image), Local::now());
    }
    assert_eq!(session.history().len(), HISTORY_CAPACITY);
    session.clear_history();
    assert!(session.history().is_empty());
}
