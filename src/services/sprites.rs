//! Thumbnail sprite sheet and WebVTT track generation.
//!
//! Samples evenly spaced frames from a stored video, tiles them into a
//! single sprite image with one ffmpeg pass, and writes a WebVTT file
//! mapping playback time ranges to `#xywh` regions of the sprite.

use crate::config::SpriteConfig;
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;
use tokio::process::Command;
use uuid::Uuid;

pub const SOURCE_FILE: &str = "original.mp4";
pub const SPRITE_FILE: &str = "sprite.jpg";
pub const VTT_FILE: &str = "thumbnails.vtt";

// Upper bound on frames selected in the single-pass ffmpeg filter; the
// sampling interval widens for longer videos to stay under it.
const MAX_TILES: usize = 50;

pub async fn generate(media_root: &Path, video_id: Uuid, cfg: &SpriteConfig) -> Result<()> {
    let video_dir = media_root.join(video_id.to_string());
    let input = video_dir.join(SOURCE_FILE);

    let duration = probe_duration(&input).await?;
    let timestamps = sample_timestamps(duration, cfg.interval_secs);

    create_sprite(&input, &timestamps, cfg, &video_dir.join(SPRITE_FILE)).await?;

    let vtt = build_vtt(&timestamps, cfg, SPRITE_FILE);
    fs::write(video_dir.join(VTT_FILE), vtt)
        .await
        .context("failed to write VTT file")?;

    log::info!(
        "Generated sprite for {} ({} frames over {:.1}s)",
        video_id,
        timestamps.len(),
        duration
    );
    Ok(())
}

async fn probe_duration(input: &Path) -> Result<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(input)
        .output()
        .await
        .context("failed to run ffprobe")?;

    if !output.status.success() {
        anyhow::bail!("ffprobe exited with {}", output.status);
    }

    String::from_utf8(output.stdout)
        .context("ffprobe output was not UTF-8")?
        .trim()
        .parse::<f64>()
        .context("unparseable ffprobe duration")
}

/// One timestamp per `interval_secs`, starting at 0.5s to avoid black
/// leader frames. The interval widens so long videos stay within
/// `MAX_TILES` frames.
fn sample_timestamps(duration: f64, interval_secs: usize) -> Vec<f64> {
    let whole = duration as usize;
    let mut step = interval_secs.max(1);
    if whole.div_ceil(step) > MAX_TILES {
        step = whole.div_ceil(MAX_TILES);
    }

    let mut timestamps: Vec<f64> = (0..whole)
        .step_by(step)
        .map(|i| (i as f64).max(0.5))
        .collect();
    timestamps.truncate(MAX_TILES);
    if timestamps.is_empty() {
        timestamps.push(0.5);
    }
    timestamps
}

async fn create_sprite(
    input: &Path,
    timestamps: &[f64],
    cfg: &SpriteConfig,
    output: &Path,
) -> Result<()> {
    let rows = timestamps.len().div_ceil(cfg.cols);
    let select = timestamps
        .iter()
        .map(|ts| format!("eq(t,{})", ts))
        .collect::<Vec<_>>()
        .join("+");
    let filter = format!(
        "select='{}',scale={}:{}:flags=lanczos,tile={}x{}",
        select, cfg.tile_width, cfg.tile_height, cfg.cols, rows
    );

    let status = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(input)
        .arg("-filter_complex")
        .arg(&filter)
        .args(["-c:v", "mjpeg", "-q:v", &jpeg_quantizer(cfg.quality).to_string()])
        .arg(output)
        .args(["-hide_banner", "-loglevel", "error"])
        .status()
        .await
        .context("failed to run ffmpeg")?;

    if !status.success() {
        anyhow::bail!("ffmpeg sprite pass failed with {}", status);
    }
    Ok(())
}

// Maps a 1-100 quality setting onto mjpeg's 2-31 quantizer scale
// (lower is better).
fn jpeg_quantizer(quality: u32) -> u32 {
    (32u32.saturating_sub(quality * 30 / 100)).clamp(2, 31)
}

fn build_vtt(timestamps: &[f64], cfg: &SpriteConfig, sprite_rel: &str) -> String {
    let mut lines = vec!["WEBVTT".to_string(), String::new()];
    for (idx, &ts) in timestamps.iter().enumerate() {
        let start = format_timestamp(ts);
        let end = match timestamps.get(idx + 1) {
            Some(&next) => format_timestamp(next),
            None => format_timestamp(ts + 1.0),
        };
        let x = (idx % cfg.cols) * cfg.tile_width;
        let y = (idx / cfg.cols) * cfg.tile_height;
        lines.push(format!("{} --> {}", start, end));
        lines.push(format!(
            "{}#xywh={},{},{},{}",
            sprite_rel, x, y, cfg.tile_width, cfg.tile_height
        ));
        lines.push(String::new());
    }
    lines.join("\n")
}

fn format_timestamp(seconds: f64) -> String {
    let whole = seconds as u64;
    let ms = ((seconds - whole as f64) * 1000.0) as u32;
    let s = whole % 60;
    let m = (whole / 60) % 60;
    let h = whole / 3600;
    format!("{:02}:{:02}:{:02}.{:03}", h, m, s, ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SpriteConfig {
        SpriteConfig::default()
    }

    #[test]
    fn timestamps_formatted_as_webvtt() {
        assert_eq!(format_timestamp(0.5), "00:00:00.500");
        assert_eq!(format_timestamp(5.0), "00:00:05.000");
        assert_eq!(format_timestamp(65.0), "00:01:05.000");
        assert_eq!(format_timestamp(3661.25), "01:01:01.250");
    }

    #[test]
    fn short_video_sampled_at_interval() {
        assert_eq!(sample_timestamps(12.0, 5), vec![0.5, 5.0, 10.0]);
    }

    #[test]
    fn zero_length_video_gets_one_frame() {
        assert_eq!(sample_timestamps(0.0, 5), vec![0.5]);
    }

    #[test]
    fn long_video_stays_under_tile_cap() {
        let ts = sample_timestamps(7200.0, 5);
        assert!(ts.len() <= 50);
        // Still spans most of the video, not just the start.
        assert!(*ts.last().unwrap() > 7000.0);
    }

    #[test]
    fn vtt_lays_tiles_out_left_to_right() {
        let cfg = test_config();
        let vtt = build_vtt(&[0.5, 5.0], &cfg, "sprite.jpg");
        let lines: Vec<&str> = vtt.lines().collect();
        assert_eq!(lines[0], "WEBVTT");
        assert_eq!(lines[2], "00:00:00.500 --> 00:00:05.000");
        assert_eq!(lines[3], "sprite.jpg#xywh=0,0,320,180");
        assert_eq!(lines[5], "00:00:05.000 --> 00:00:06.000");
        assert_eq!(lines[6], "sprite.jpg#xywh=320,0,320,180");
    }

    #[test]
    fn vtt_wraps_to_next_row_after_cols() {
        let mut cfg = test_config();
        cfg.cols = 2;
        let vtt = build_vtt(&[0.5, 5.0, 10.0], &cfg, "sprite.jpg");
        // Third tile lands at the start of row two.
        assert!(vtt.contains("sprite.jpg#xywh=0,180,320,180"));
    }

    #[test]
    fn quality_maps_onto_quantizer_scale() {
        assert_eq!(jpeg_quantizer(85), 7);
        assert_eq!(jpeg_quantizer(100), 2);
        assert_eq!(jpeg_quantizer(1), 31);
    }
}
