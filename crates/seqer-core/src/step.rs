//! Quantization of ticks into discrete steps

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeqerError};
use crate::sequence::Sequence;

/// Upper bound for steps-per-beat / steps-per-measure zooming
const MAX_SUBDIVISION: u32 = 1024;

/// How much time one step covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepSize {
    /// Fixed number of ticks per step
    TicksPerStep(u64),
    /// Subdivision of a quarter note
    StepsPerBeat(u32),
    /// Subdivision of a measure, following the sequence's time signatures
    StepsPerMeasure(u32),
}

impl Default for StepSize {
    fn default() -> Self {
        Self::StepsPerMeasure(4)
    }
}

impl StepSize {
    /// Finer steps
    pub fn zoom_in(self) -> Self {
        match self {
            Self::TicksPerStep(n) => Self::TicksPerStep((n / 2).max(1)),
            Self::StepsPerBeat(n) => Self::StepsPerBeat((n * 2).min(MAX_SUBDIVISION)),
            Self::StepsPerMeasure(n) => Self::StepsPerMeasure((n * 2).min(MAX_SUBDIVISION)),
        }
    }

    /// Coarser steps
    pub fn zoom_out(self) -> Self {
        match self {
            Self::TicksPerStep(n) => Self::TicksPerStep(n.saturating_mul(2)),
            Self::StepsPerBeat(n) => Self::StepsPerBeat((n / 2).max(1)),
            Self::StepsPerMeasure(n) => Self::StepsPerMeasure((n / 2).max(1)),
        }
    }
}

/// One linear piece of the tick/step mapping.
///
/// A step inside the segment spans `num / den` ticks. The last step of a
/// segment is stretched up to the next segment's first tick so every tick
/// belongs to exactly one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    start_tick: u64,
    start_step: u64,
    num: u64,
    den: u64,
}

impl Segment {
    fn new(start_tick: u64, start_step: u64, num: u64, den: u64) -> Result<Self> {
        if den == 0 || num < den {
            return Err(SeqerError::InvalidStepSize(format!(
                "a step must span at least one tick (got {num}/{den})"
            )));
        }
        let g = gcd(num, den);
        Ok(Self {
            start_tick,
            start_step,
            num: num / g,
            den: den / g,
        })
    }

    fn step_at(&self, tick: u64) -> u64 {
        let offset = (tick - self.start_tick) as u128;
        self.start_step + (offset * self.den as u128 / self.num as u128) as u64
    }

    fn fractional_step_at(&self, tick: u64) -> f64 {
        let offset = (tick - self.start_tick) as f64;
        self.start_step as f64 + offset * self.den as f64 / self.num as f64
    }

    fn tick_at(&self, step: u64) -> u64 {
        let offset = (step - self.start_step) as u128;
        let ticks = (offset * self.num as u128).div_ceil(self.den as u128);
        self.start_tick.saturating_add(u64::try_from(ticks).unwrap_or(u64::MAX))
    }

    /// Number of distinct step starts within `length` ticks
    fn steps_within(&self, length: u64) -> u64 {
        if length == 0 {
            return 0;
        }
        ((length - 1) as u128 * self.den as u128 / self.num as u128) as u64 + 1
    }
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 { a.max(1) } else { gcd(b, a % b) }
}

/// Bidirectional tick/step mapping built from a [`StepSize`]
#[derive(Debug, Clone, PartialEq)]
pub struct StepIndex {
    size: StepSize,
    /// Never empty; first segment starts at tick 0
    segments: Vec<Segment>,
}

impl StepIndex {
    /// Build the mapping. `time_signatures` is (tick, numerator, denominator) in
    /// time order and only matters for [`StepSize::StepsPerMeasure`].
    pub fn new(size: StepSize, ppq: u16, time_signatures: &[(u64, u8, u8)]) -> Result<Self> {
        let ppq = ppq as u64;
        let segments = match size {
            StepSize::TicksPerStep(n) => vec![Segment::new(0, 0, n, 1)?],
            StepSize::StepsPerBeat(n) => {
                if n == 0 {
                    return Err(SeqerError::InvalidStepSize("zero steps per beat".into()));
                }
                vec![Segment::new(0, 0, ppq, n as u64)?]
            }
            StepSize::StepsPerMeasure(n) => {
                if n == 0 {
                    return Err(SeqerError::InvalidStepSize("zero steps per measure".into()));
                }
                Self::measure_segments(ppq, n as u64, time_signatures)?
            }
        };
        Ok(Self { size, segments })
    }

    /// Build the mapping for a sequence's resolution and time signatures
    pub fn for_sequence(size: StepSize, sequence: &Sequence) -> Result<Self> {
        Self::new(size, sequence.ppq, &sequence.time_signatures())
    }

    fn measure_segments(ppq: u64, steps_per_measure: u64, time_signatures: &[(u64, u8, u8)]) -> Result<Vec<Segment>> {
        // Later signatures at the same tick replace earlier ones
        let mut changes: Vec<(u64, u8, u8)> = Vec::new();
        for &(tick, numerator, denominator) in time_signatures {
            if numerator == 0 || denominator == 0 || !denominator.is_power_of_two() {
                return Err(SeqerError::InvalidStepSize(format!(
                    "invalid time signature {numerator}/{denominator} at tick {tick}"
                )));
            }
            match changes.last_mut() {
                Some(last) if tick < last.0 => {
                    return Err(SeqerError::InvalidStepSize(format!(
                        "time signature at tick {tick} comes after one at tick {}",
                        last.0
                    )));
                }
                Some(last) if last.0 == tick => *last = (tick, numerator, denominator),
                _ => changes.push((tick, numerator, denominator)),
            }
        }
        if changes.first().is_none_or(|c| c.0 != 0) {
            changes.insert(0, (0, 4, 4));
        }

        let mut segments: Vec<Segment> = Vec::with_capacity(changes.len());
        for (tick, numerator, denominator) in changes {
            let start_step = match segments.last() {
                Some(prev) => prev.start_step + prev.steps_within(tick - prev.start_tick),
                None => 0,
            };
            let num = ppq * 4 * numerator as u64;
            let den = denominator as u64 * steps_per_measure;
            segments.push(Segment::new(tick, start_step, num, den)?);
        }
        Ok(segments)
    }

    pub fn size(&self) -> StepSize {
        self.size
    }

    fn segment_for_tick(&self, tick: u64) -> &Segment {
        let idx = self.segments.partition_point(|s| s.start_tick <= tick);
        &self.segments[idx.saturating_sub(1)]
    }

    fn segment_for_step(&self, step: u64) -> &Segment {
        let idx = self.segments.partition_point(|s| s.start_step <= step);
        &self.segments[idx.saturating_sub(1)]
    }

    pub fn step_from_tick(&self, tick: u64) -> u64 {
        self.segment_for_tick(tick).step_at(tick)
    }

    pub fn fractional_step_from_tick(&self, tick: u64) -> f64 {
        self.segment_for_tick(tick).fractional_step_at(tick)
    }

    /// First tick of `step`
    pub fn tick_from_step(&self, step: u64) -> u64 {
        self.segment_for_step(step).tick_at(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_per_step() {
        let index = StepIndex::new(StepSize::TicksPerStep(240), 960, &[]).unwrap();
        assert_eq!(index.step_from_tick(0), 0);
        assert_eq!(index.step_from_tick(239), 0);
        assert_eq!(index.step_from_tick(240), 1);
        assert_eq!(index.tick_from_step(3), 720);
        assert!((index.fractional_step_from_tick(120) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_steps_per_measure_default_four_four() {
        // 4 steps per 4/4 measure at 960 ppq = one quarter note per step
        let index = StepIndex::new(StepSize::StepsPerMeasure(4), 960, &[]).unwrap();
        assert_eq!(index.tick_from_step(1), 960);
        assert_eq!(index.step_from_tick(3839), 3);
        assert_eq!(index.step_from_tick(3840), 4);
    }

    #[test]
    fn test_steps_follow_time_signature_changes() {
        // Two measures of 3/4, then 6/8 (same measure length, 4 steps each)
        let sigs = [(0, 3, 4), (5760, 6, 8)];
        let index = StepIndex::new(StepSize::StepsPerMeasure(4), 960, &sigs).unwrap();
        assert_eq!(index.tick_from_step(4), 2880);
        assert_eq!(index.step_from_tick(5760), 8);
        assert_eq!(index.tick_from_step(8), 5760);

        // A change in the middle of a step cuts the step short
        let sigs = [(0, 4, 4), (1000, 3, 4)];
        let index = StepIndex::new(StepSize::StepsPerMeasure(4), 960, &sigs).unwrap();
        assert_eq!(index.step_from_tick(999), 1);
        assert_eq!(index.step_from_tick(1000), 2);
        assert_eq!(index.tick_from_step(2), 1000);
    }

    #[test]
    fn test_uneven_steps_round_trip() {
        // 7 steps per 4/4 measure: non-integer ticks per step
        let index = StepIndex::new(StepSize::StepsPerMeasure(7), 960, &[(0, 4, 4), (10_000, 5, 8)]).unwrap();
        for s in 0..200 {
            assert_eq!(index.step_from_tick(index.tick_from_step(s)), s, "step {s}");
        }
    }

    #[test]
    fn test_rejects_sub_tick_steps() {
        assert!(matches!(
            StepIndex::new(StepSize::TicksPerStep(0), 960, &[]),
            Err(SeqerError::InvalidStepSize(_))
        ));
        assert!(StepIndex::new(StepSize::StepsPerBeat(961), 960, &[]).is_err());
        assert!(StepIndex::new(StepSize::StepsPerMeasure(0), 960, &[]).is_err());
        assert!(StepIndex::new(StepSize::StepsPerMeasure(4), 960, &[(0, 4, 3)]).is_err());
    }

    #[test]
    fn test_rejects_unordered_time_signatures() {
        assert!(matches!(
            StepIndex::new(StepSize::StepsPerMeasure(4), 960, &[(1000, 4, 4), (0, 3, 4)]),
            Err(SeqerError::InvalidStepSize(_))
        ));
        // Only measure steps read time signatures
        assert!(StepIndex::new(StepSize::StepsPerBeat(4), 960, &[(1000, 4, 4), (0, 3, 4)]).is_ok());
    }

    #[test]
    fn test_tick_from_step_saturates() {
        let index = StepIndex::new(StepSize::TicksPerStep(u64::MAX / 2), 960, &[]).unwrap();
        assert_eq!(index.tick_from_step(2), u64::MAX - 1);
        assert_eq!(index.tick_from_step(4), u64::MAX);
        assert_eq!(index.tick_from_step(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_zoom() {
        assert_eq!(StepSize::StepsPerMeasure(4).zoom_in(), StepSize::StepsPerMeasure(8));
        assert_eq!(StepSize::StepsPerMeasure(1).zoom_out(), StepSize::StepsPerMeasure(1));
        assert_eq!(StepSize::TicksPerStep(1).zoom_in(), StepSize::TicksPerStep(1));
        assert_eq!(StepSize::StepsPerBeat(2).zoom_out(), StepSize::StepsPerBeat(1));
    }
}
