//! Synthesized feedback sounds and the click pacing schedule.
//!
//! Sounds are generated, not shipped: a short damped click for each tick
//! of a spin and a bell chord for the settle. Output goes through the
//! `AudioSink` collaborator so the engine never touches a device.

use std::time::{Duration, Instant};

use log::debug;
use rand::Rng;

use crate::config::AudioConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Clip {
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples.len() as f64 / self.sample_rate as f64)
    }
}

/// 0.1 s click: an 800 Hz tone under a steep exponential envelope with a
/// small noise floor for texture.
pub fn click_clip(sample_rate: u32) -> Clip {
    let mut rng = rand::rng();
    let len = (sample_rate as f64 * 0.1) as usize;
    let samples = (0..len)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let envelope = (-t * 50.0).exp();
            let noise = (rng.random_range(0.0..1.0) - 0.5) * 0.1;
            (((2.0 * std::f64::consts::PI * 800.0 * t).sin() * envelope + noise) * 0.3) as f32
        })
        .collect();
    Clip {
        samples,
        sample_rate,
    }
}

/// 2 s bell: C5/E5/G5/C6 partials under a slow exponential decay.
pub fn bell_clip(sample_rate: u32) -> Clip {
    const PARTIALS: [(f64, f64); 4] = [(523.0, 1.0), (659.0, 0.8), (784.0, 0.6), (1047.0, 0.4)];
    let len = (sample_rate as f64 * 2.0) as usize;
    let samples = (0..len)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let envelope = (-t * 1.5).exp();
            let tone: f64 = PARTIALS
                .iter()
                .map(|(freq, gain)| (2.0 * std::f64::consts::PI * freq * t).sin() * gain)
                .sum();
            (tone * envelope * 0.2) as f32
        })
        .collect();
    Clip {
        samples,
        sample_rate,
    }
}

/// Schedules spin clicks: fast at launch, geometrically relaxing as the
/// wheel decelerates, and silenced the moment the spin phase ends.
#[derive(Debug)]
pub struct ClickPacer {
    start: Duration,
    ceiling: Duration,
    relax: f64,
    interval: Duration,
    next_at: Option<Instant>,
}

impl ClickPacer {
    pub fn new(config: &AudioConfig) -> Self {
        let start = Duration::from_millis(config.click_start_ms);
        Self {
            start,
            ceiling: Duration::from_millis(config.click_ceiling_ms),
            relax: config.click_relax,
            interval: start,
            next_at: None,
        }
    }

    /// Arms the pacer; the first click fires on the next poll.
    pub fn begin(&mut self, now: Instant) {
        self.interval = self.start;
        self.next_at = Some(now);
    }

    pub fn stop(&mut self) {
        self.next_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_at.is_some()
    }

    /// Returns true when a click is due. `spinning` false stops the pacer
    /// immediately, click pending or not.
    pub fn poll(&mut self, now: Instant, spinning: bool) -> bool {
        if !spinning {
            self.stop();
            return false;
        }
        match self.next_at {
            Some(due) if now >= due => {
                self.interval = Duration::from_secs_f64(
                    (self.interval.as_secs_f64() * self.relax)
                        .min(self.ceiling.as_secs_f64()),
                );
                self.next_at = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    #[cfg(test)]
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Where the sounds go. The engine only ever hands over prebuilt clips.
pub trait AudioSink {
    fn play(&mut self, clip: &Clip);
}

/// Sink that reports playback in the log; stands in where no audio
/// device is wired up.
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, clip: &Clip) {
        debug!(
            "audio: {} samples @ {} Hz ({:?})",
            clip.samples.len(),
            clip.sample_rate,
            clip.duration()
        );
    }
}

/// The audio collaborator: owns the synthesized clips, the pacer and the
/// sink, and reacts to session phase changes.
pub struct Chime {
    click: Clip,
    bell: Clip,
    pacer: ClickPacer,
    sink: Box<dyn AudioSink>,
}

impl Chime {
    pub fn new(config: &AudioConfig, sink: Box<dyn AudioSink>) -> Self {
        Self {
            click: click_clip(config.sample_rate),
            bell: bell_clip(config.sample_rate),
            pacer: ClickPacer::new(config),
            sink,
        }
    }

    pub fn on_spin_start(&mut self, now: Instant) {
        self.pacer.begin(now);
    }

    pub fn on_frame(&mut self, now: Instant, spinning: bool) {
        if self.pacer.poll(now, spinning) {
            self.sink.play(&self.click);
        }
    }

    pub fn on_settle(&mut self) {
        self.pacer.stop();
        self.sink.play(&self.bell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clips_have_expected_length_and_bounds() {
        let click = click_clip(44_100);
        assert_eq!(click.samples.len(), 4410);
        let bell = bell_clip(44_100);
        assert_eq!(bell.samples.len(), 88_200);
        for s in click.samples.iter().chain(bell.samples.iter()) {
            assert!(s.abs() <= 1.0, "sample clipped: {s}");
        }
    }

    #[test]
    fn envelopes_decay() {
        let bell = bell_clip(44_100);
        let peak = |range: std::ops::Range<usize>| {
            bell.samples[range].iter().fold(0.0f32, |m, s| m.max(s.abs()))
        };
        let head = peak(0..8_820);
        let tail = peak(79_380..88_200);
        assert!(head > tail * 4.0, "bell did not decay: {head} vs {tail}");
    }

    #[test]
    fn pacer_relaxes_geometrically_to_the_ceiling() {
        let mut pacer = ClickPacer::new(&AudioConfig::default());
        let t0 = Instant::now();
        pacer.begin(t0);

        assert!(pacer.poll(t0, true));
        assert_eq!(pacer.interval(), Duration::from_secs_f64(0.050 * 1.05));

        // Fast-forward through enough clicks to hit the ceiling.
        let mut now = t0;
        for _ in 0..60 {
            now += Duration::from_millis(400);
            assert!(pacer.poll(now, true));
        }
        assert_eq!(pacer.interval(), Duration::from_millis(300));
    }

    #[test]
    fn pacer_stops_when_spin_ends() {
        let mut pacer = ClickPacer::new(&AudioConfig::default());
        let t0 = Instant::now();
        pacer.begin(t0);
        assert!(pacer.is_running());
        assert!(!pacer.poll(t0, false));
        assert!(!pacer.is_running());
        // Once stopped it stays silent even if spinning resumes on poll.
        assert!(!pacer.poll(t0 + Duration::from_secs(1), true));
    }
}
