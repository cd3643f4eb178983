//! Workspace-name popup with a fading exit.
//!
//! [`NameNotifier`] centres a small card with the workspace name on the
//! anchor region and fades it out over a fixed number of timer ticks.
//!
//! # Lifecycle
//!
//! ```text
//!            notify                 tick (count > 0, before deadline)
//!   Idle ───────────────▶ Fading ◀──────────────┐
//!    ▲                      │  └────────────────┘
//!    │  tick (count == 0    │
//!    └── or deadline passed)┘
//! ```
//!
//! A new notification while fading releases the previous card first.  The
//! repeating timer is armed by `notify` if it is not already running, and
//! disarms itself on the tick that finds nothing left to draw.  The owner
//! drives it with [`NameNotifier::poll`], waiting at most
//! [`NameNotifier::next_tick_in`] between calls.  Drawing goes through an
//! [`OsdSurface`], so the state machine is independent of any toolkit.

use crate::config::NotifierConfig;
use crate::geometry::Rect;
use crate::traits::Notifier;
use log::{debug, warn};
use std::time::{Duration, Instant};

/// Error from building popup resources.
#[derive(Debug, thiserror::Error)]
pub enum OsdError {
    #[error("render failed: {0}")]
    Render(String),
    #[error("backdrop capture failed: {0}")]
    Capture(String),
}

/// Handle to an image owned by an [`OsdSurface`].
#[derive(Debug, PartialEq, Eq)]
pub struct Image {
    pub id: u64,
    pub geometry: Rect,
}

/// Where the popup is drawn.
///
/// Every [`Image`] handed out must come back through
/// [`release`](OsdSurface::release) exactly once.
pub trait OsdSurface {
    /// Size of `text` in pixels.
    fn measure(&self, text: &str) -> (i32, i32);

    /// Render the label into a new image and map the popup at `geometry`.
    fn render_text(&mut self, text: &str, geometry: Rect) -> Result<Image, OsdError>;

    /// Snapshot what lies beneath `geometry`, for blending.
    fn capture_backdrop(&mut self, geometry: Rect) -> Result<Image, OsdError>;

    /// Draw `text` over `back` at `opacity` (0-255).
    fn compose(&mut self, back: &Image, text: &Image, opacity: u8);

    /// Unmap the popup.
    fn hide(&mut self);

    fn release(&mut self, image: Image);
}

/// Resources of a popup currently on screen.
#[derive(Debug)]
struct Card {
    text: Image,
    back: Image,
    /// Frames left to draw.
    count: u32,
    deadline: Instant,
}

#[derive(Debug)]
enum FadeState {
    Idle,
    Fading(Card),
}

/// Padding around the label, in pixels.
const PADDING: i32 = 4;

/// The workspace-name popup.
#[derive(Debug)]
pub struct NameNotifier<S: OsdSurface> {
    surface: S,
    config: NotifierConfig,
    state: FadeState,
    timer_armed: bool,
    /// When the timer last fired, or was armed.
    last_tick: Instant,
}

impl<S: OsdSurface> NameNotifier<S> {
    /// Timing values out of range are clamped, see [`NotifierConfig::clamped`].
    pub fn new(surface: S, config: NotifierConfig) -> Self {
        Self {
            surface,
            config: config.clamped(),
            state: FadeState::Idle,
            timer_armed: false,
            last_tick: Instant::now(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Interval between fade ticks.
    pub fn fade_delay(&self) -> Duration {
        Duration::from_millis(self.config.fade_delay_ms)
    }

    /// Whether the repeating timer should be driving [`tick`](Self::tick).
    pub fn is_timer_armed(&self) -> bool {
        self.timer_armed
    }

    pub fn is_fading(&self) -> bool {
        matches!(self.state, FadeState::Fading(_))
    }

    /// Time left until the next frame is due, or `None` while the timer is
    /// disarmed.
    pub fn next_tick_in(&self, now: Instant) -> Option<Duration> {
        self.timer_armed
            .then(|| (self.last_tick + self.fade_delay()).saturating_duration_since(now))
    }

    /// Fire the timer if a frame is due at `now`.
    ///
    /// Safe to call as often as convenient; frames advance at most once per
    /// fade interval.
    pub fn poll(&mut self, now: Instant) {
        if self.next_tick_in(now) == Some(Duration::ZERO) {
            self.last_tick = now;
            self.tick(now);
        }
    }

    /// Show `text` centred on `anchor`, replacing any popup already fading.
    pub fn notify_at(&mut self, text: &str, anchor: Rect, now: Instant) {
        self.release_card();

        if !self.timer_armed {
            debug!("arming popup timer ({:?})", self.fade_delay());
            self.timer_armed = true;
            self.last_tick = now;
        }

        let (w, h) = self.surface.measure(text);
        let (w, h) = (w + PADDING, h + PADDING);
        let geometry = Rect::new(
            anchor.x + (anchor.width - w) / 2,
            anchor.y + (anchor.height - h) / 2,
            w,
            h,
        );

        let text_img = match self.surface.render_text(text, geometry) {
            Ok(img) => img,
            Err(e) => {
                warn!("workspace popup skipped: {}", e);
                return;
            }
        };
        let back = match self.surface.capture_backdrop(geometry) {
            Ok(img) => img,
            Err(e) => {
                warn!("workspace popup skipped: {}", e);
                self.surface.release(text_img);
                return;
            }
        };

        let steps = self.config.steps;
        let deadline = now
            + Duration::from_millis(self.config.grace_ms)
            + Duration::from_millis(self.config.linger_ms)
            + self.fade_delay() * steps;
        self.state = FadeState::Fading(Card {
            text: text_img,
            back,
            count: steps,
            deadline,
        });
    }

    /// Advance the fade by one frame.
    ///
    /// Returns whether the timer should keep running.
    pub fn tick(&mut self, now: Instant) -> bool {
        let steps = self.config.steps;
        let drawn = match &mut self.state {
            FadeState::Fading(card) if card.count > 0 && now <= card.deadline => {
                let opacity = (card.count.min(steps) * 255 / steps) as u8;
                self.surface.compose(&card.back, &card.text, opacity);
                card.count -= 1;
                true
            }
            _ => false,
        };
        if drawn {
            return true;
        }

        self.surface.hide();
        self.release_card();
        self.timer_armed = false;
        false
    }

    fn release_card(&mut self) {
        if let FadeState::Fading(card) = std::mem::replace(&mut self.state, FadeState::Idle) {
            self.surface.release(card.text);
            self.surface.release(card.back);
        }
    }
}

impl<S: OsdSurface> Notifier for NameNotifier<S> {
    fn notify(&mut self, text: &str, anchor: Rect) {
        self.notify_at(text, anchor, Instant::now());
    }
}
