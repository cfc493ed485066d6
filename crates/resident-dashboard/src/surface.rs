//! Display surfaces and their tick loop.
//!
//! A surface fetches the base record once when it starts, then redraws on a
//! clock tick and on its own photo-rotation timer until it is stopped. The
//! override store is checked on every clock tick so that an admin save made
//! from another process shows up without refetching the base.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::sync::Notify;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::error::Result;
use crate::loader::Loader;
use crate::selector::{DashboardView, MealBands};

/// The kinds of display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    /// Edge-to-edge photo with large clock and one info line.
    Frame,
    /// Large photo above the full board.
    Hero,
    /// Full board with a small slideshow.
    Slideshow,
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Frame => write!(f, "frame"),
            Self::Hero => write!(f, "hero"),
            Self::Slideshow => write!(f, "slideshow"),
        }
    }
}

/// Timing for one running surface.
#[derive(Debug, Clone)]
pub struct SurfaceOptions {
    /// Which surface is running.
    pub surface: Surface,
    /// Clock tick period.
    pub clock_tick: Duration,
    /// Photo rotation period.
    pub rotation: Duration,
    /// Meal hint cutoffs.
    pub bands: MealBands,
    /// Stop after this many clock ticks.
    pub max_ticks: Option<u64>,
}

/// A cloneable handle used to stop a running surface.
#[derive(Debug, Clone, Default)]
pub struct SurfaceHandle {
    stop_signal: Arc<AtomicBool>,
    wake: Arc<Notify>,
}

impl SurfaceHandle {
    /// Create a new handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal the surface to stop.
    pub fn stop(&self) {
        self.stop_signal.store(true, Ordering::SeqCst);
        self.wake.notify_one();
    }

    /// Check if the stop signal has been sent.
    #[must_use]
    pub fn should_stop(&self) -> bool {
        self.stop_signal.load(Ordering::SeqCst)
    }

    async fn stopped(&self) {
        self.wake.notified().await;
    }
}

/// Counters reported when a surface stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceStats {
    /// Clock ticks handled.
    pub ticks: u64,
    /// Frames rendered.
    pub renders: u64,
    /// Times a changed override was merged in.
    pub reloads: u64,
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Run a surface until `handle` is stopped or `max_ticks` is reached.
///
/// `now` supplies the local wall-clock time and `render` draws each frame.
///
/// # Errors
///
/// Returns a load error if the base record cannot be fetched, or any error
/// returned by `render`.
pub async fn run_surface<R>(
    loader: &Loader,
    options: &SurfaceOptions,
    handle: &SurfaceHandle,
    now: fn() -> NaiveDateTime,
    mut render: R,
) -> Result<SurfaceStats>
where
    R: FnMut(&DashboardView<'_>) -> Result<()>,
{
    let base = loader.fetch_base().await?;
    let mut fingerprint = loader.store().fingerprint();
    let mut record = loader.merge_with_override(base.clone());

    info!(surface = %options.surface, "Surface started");

    let started = Instant::now();
    let mut clock = tokio::time::interval(options.clock_tick);
    clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut rotation = tokio::time::interval(options.rotation);
    rotation.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut stats = SurfaceStats::default();

    loop {
        tokio::select! {
            _ = clock.tick() => {
                stats.ticks += 1;
                let current = loader.store().fingerprint();
                if current != fingerprint {
                    debug!("Override changed, merging again");
                    fingerprint = current;
                    record = loader.merge_with_override(base.clone());
                    stats.reloads += 1;
                }
            }
            _ = rotation.tick() => {}
            () = handle.stopped() => {}
        }

        if handle.should_stop() {
            break;
        }

        let view = DashboardView::build(
            &record,
            now(),
            millis(started.elapsed()),
            millis(options.rotation),
            options.bands,
        );
        render(&view)?;
        stats.renders += 1;

        if options.max_ticks.is_some_and(|max| stats.ticks >= max) {
            break;
        }
    }

    info!(
        ticks = stats.ticks,
        renders = stats.renders,
        "Surface stopped"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::FileSource;
    use crate::record::{DashboardRecord, MealPlan};
    use crate::storage::OverrideStore;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn options(max_ticks: Option<u64>) -> SurfaceOptions {
        SurfaceOptions {
            surface: Surface::Slideshow,
            clock_tick: Duration::from_millis(10),
            rotation: Duration::from_millis(25),
            bands: MealBands::default(),
            max_ticks,
        }
    }

    fn loader_for(name: &str) -> (Loader, std::path::PathBuf) {
        let path = std::env::temp_dir().join(format!(
            "resident_dashboard_surface_{name}_{}.json",
            std::process::id()
        ));
        let base = DashboardRecord {
            meals: MealPlan {
                breakfast: "Waffles".to_string(),
                lunch: "Soup".to_string(),
                dinner: "Lasagna".to_string(),
            },
            ..DashboardRecord::default()
        };
        std::fs::write(&path, base.to_pretty_json().unwrap()).unwrap();
        let loader = Loader::new(
            Box::new(FileSource::new(&path)),
            OverrideStore::open_in_memory().unwrap(),
        );
        (loader, path)
    }

    #[test]
    fn test_surface_display() {
        assert_eq!(Surface::Frame.to_string(), "frame");
        assert_eq!(Surface::Hero.to_string(), "hero");
        assert_eq!(Surface::Slideshow.to_string(), "slideshow");
    }

    #[test]
    fn test_handle_stop_is_shared() {
        let handle1 = SurfaceHandle::new();
        let handle2 = handle1.clone();
        assert!(!handle2.should_stop());

        handle1.stop();
        assert!(handle2.should_stop());
    }

    #[tokio::test]
    async fn test_run_surface_stops_after_max_ticks() {
        let (loader, path) = loader_for("max_ticks");
        let handle = SurfaceHandle::new();
        let mut hints = Vec::new();

        let stats = run_surface(&loader, &options(Some(3)), &handle, fixed_now, |view| {
            hints.push(view.meal_hint.text.to_string());
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(stats.ticks, 3);
        assert!(stats.renders >= 3);
        assert!(hints.iter().all(|h| h == "Soup"));
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_run_surface_stops_on_handle() {
        let (loader, path) = loader_for("handle");
        let handle = SurfaceHandle::new();
        let stopper = handle.clone();

        let stats = run_surface(&loader, &options(None), &handle, fixed_now, |_| {
            stopper.stop();
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(stats.renders, 1);
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_run_surface_picks_up_override_changes() {
        let (loader, path) = loader_for("reload");
        let handle = SurfaceHandle::new();
        let mut seen = Vec::new();

        let stats = run_surface(&loader, &options(Some(4)), &handle, fixed_now, |view| {
            seen.push(view.meal_hint.text.to_string());
            if seen.len() == 1 {
                let mut edited = DashboardRecord {
                    meals: view.meals.clone(),
                    ..DashboardRecord::default()
                };
                edited.meals.lunch = "Chili".to_string();
                let stamp = Utc.with_ymd_and_hms(2026, 10, 18, 10, 0, 0).unwrap();
                loader.store().write_override(&edited, stamp)?;
            }
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(stats.reloads, 1);
        assert_eq!(seen.first().map(String::as_str), Some("Soup"));
        assert_eq!(seen.last().map(String::as_str), Some("Chili"));
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_run_surface_load_failure() {
        let loader = Loader::new(
            Box::new(FileSource::new("/nonexistent/dashboard.json")),
            OverrideStore::open_in_memory().unwrap(),
        );
        let err = run_surface(
            &loader,
            &options(Some(1)),
            &SurfaceHandle::new(),
            fixed_now,
            |_| Ok(()),
        )
        .await
        .unwrap_err();
        assert!(err.is_load_error());
    }
}
