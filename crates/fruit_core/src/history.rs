//! Bounded list of recent predictions, newest first.

use crate::api::PredictionResponse;
use crate::error::Result;
use crate::format::{format_clock, format_percent};
use chrono::{DateTime, Local};
use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use std::collections::VecDeque;
use std::path::Path;

pub const HISTORY_CAPACITY: usize = 5;
/// Thumbnails are 4:3, cropped to fill.
pub const HISTORY_THUMB_WIDTH: u32 = 160;
pub const HISTORY_THUMB_HEIGHT: u32 = 120;

/// Summary of one past prediction.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: u64,
    pub fruit: String,
    pub confidence: f64,
    /// Local time of the prediction as `HH:MM`.
    pub time: String,
    pub thumbnail: Option<RgbaImage>,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    next_id: u64,
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl History {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            next_id: 1,
        }
    }

    /// Prepends an entry derived from `result`, evicting the oldest when full.
    /// Returns the id of the new entry.
    pub fn record(
        &mut self,
        result: &PredictionResponse,
        preview: Option<&RgbaImage>,
        at: DateTime<Local>,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let thumbnail = preview.map(thumbnail_of);
        self.entries.push_front(HistoryEntry {
            id,
            fruit: result.prediction.fruit.clone(),
            confidence: result.prediction.confidence,
            time: format_clock(&at),
            thumbnail,
        });
        self.entries.truncate(self.capacity);
        id
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }
}

/// Scales the preview to cover the thumbnail box and crops the overflow.
fn thumbnail_of(preview: &RgbaImage) -> RgbaImage {
    DynamicImage::ImageRgba8(preview.clone())
        .resize_to_fill(HISTORY_THUMB_WIDTH, HISTORY_THUMB_HEIGHT, FilterType::Triangle)
        .into_rgba8()
}

/// Export the history to CSV with headers:
/// fruit,confidence,time
pub fn export_history_csv<'a>(
    entries: impl IntoIterator<Item = &'a HistoryEntry>,
    path: impl AsRef<Path>,
) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["fruit", "confidence", "time"])?;
    for entry in entries {
        wtr.write_record([
            entry.fruit.as_str(),
            format_percent(entry.confidence).as_str(),
            entry.time.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
