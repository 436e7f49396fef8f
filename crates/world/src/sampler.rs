use crate::config::{CountRange, GeometryConfig, SizeRange};
use rand::Rng;
use rand::rngs::ThreadRng;

/// Largest `f64` strictly below 1.0.
const ONE_BELOW: f64 = 1.0 - f64::EPSILON / 2.0;

/// A source of uniform values in `[0, 1)`.
///
/// Production wiring uses [`ThreadSource`]; tests feed a [`SequenceSource`]
/// so that layouts are reproducible.
pub trait UnitSource {
    fn next_unit(&mut self) -> f64;
}

impl<S: UnitSource + ?Sized> UnitSource for &mut S {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Adapts any `FnMut() -> f64` closure.
pub struct FnSource<F>(pub F);

impl<F: FnMut() -> f64> UnitSource for FnSource<F> {
    fn next_unit(&mut self) -> f64 {
        (self.0)()
    }
}

/// Non-deterministic source backed by the thread-local RNG.
pub struct ThreadSource(ThreadRng);

impl ThreadSource {
    pub fn new() -> Self {
        Self(rand::rng())
    }
}

impl Default for ThreadSource {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitSource for ThreadSource {
    fn next_unit(&mut self) -> f64 {
        self.0.random::<f64>()
    }
}

/// Seeded splitmix64 stream: same seed, same layout, on every platform.
#[derive(Debug, Clone)]
pub struct SeededSource {
    state: u64,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

impl UnitSource for SeededSource {
    fn next_unit(&mut self) -> f64 {
        // Top 53 bits map exactly onto the f64 mantissa.
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of values, wrapping around at the end.
/// An empty list yields 0.0 forever.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }

    /// Number of values consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl UnitSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

/// One building's dimensions and ground-plane position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementSample {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub x: f32,
    pub z: f32,
}

/// Draws layout values from configured ranges.
///
/// Every draw consumes exactly one unit from the source, so the number of
/// units a layout needs is known up front.
pub struct LayoutSampler<'a, S: UnitSource + ?Sized> {
    source: &'a mut S,
}

impl<'a, S: UnitSource + ?Sized> LayoutSampler<'a, S> {
    pub fn new(source: &'a mut S) -> Self {
        Self { source }
    }

    /// Next unit, forced into `[0, 1)`. NaN maps to 0.
    pub fn unit(&mut self) -> f64 {
        let u = self.source.next_unit();
        if u.is_nan() { 0.0 } else { u.clamp(0.0, ONE_BELOW) }
    }

    /// Uniform value in `[min, max]`.
    pub fn in_range(&mut self, range: SizeRange) -> f32 {
        let u = self.unit();
        let min = range.min as f64;
        let max = range.max as f64;
        ((min + u * (max - min)) as f32).clamp(range.min, range.max)
    }

    /// Uniform value in `[-span/2, span/2]`.
    pub fn centered(&mut self, span: f32) -> f32 {
        let u = self.unit();
        let half = span / 2.0;
        (((u - 0.5) * span as f64) as f32).clamp(-half, half)
    }

    /// Uniform integer in `[min, max]`, both bounds reachable.
    pub fn count(&mut self, range: CountRange) -> u32 {
        let u = self.unit();
        let spread = range.max - range.min;
        let offset = (u * (spread as f64 + 1.0)).floor() as u32;
        range.min + offset.min(spread)
    }

    /// Uniform index in `[0, len)`. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        let u = self.unit();
        ((u * len as f64).floor() as usize).min(len.saturating_sub(1))
    }

    /// Width, depth, height, x, z, drawn in that order.
    pub fn placement(&mut self, config: &GeometryConfig) -> PlacementSample {
        let width = self.in_range(config.building_width);
        let depth = self.in_range(config.building_depth);
        let height = self.in_range(config.building_height);
        let x = self.centered(config.ground_width);
        let z = self.centered(config.ground_depth);
        PlacementSample {
            width,
            depth,
            height,
            x,
            z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_source_wraps() {
        let mut s = SequenceSource::new(vec![0.1, 0.2]);
        assert_eq!(s.next_unit(), 0.1);
        assert_eq!(s.next_unit(), 0.2);
        assert_eq!(s.next_unit(), 0.1);
        assert_eq!(s.consumed(), 3);
    }

    #[test]
    fn empty_sequence_yields_zero() {
        let mut s = SequenceSource::new(Vec::new());
        assert_eq!(s.next_unit(), 0.0);
    }

    #[test]
    fn seeded_source_is_deterministic_and_in_unit_interval() {
        let mut a = SeededSource::new(42);
        let mut b = SeededSource::new(42);
        for _ in 0..1000 {
            let x = a.next_unit();
            assert_eq!(x, b.next_unit());
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SeededSource::new(1);
        let mut b = SeededSource::new(2);
        assert_ne!(a.next_unit(), b.next_unit());
    }

    #[test]
    fn thread_source_in_unit_interval() {
        let mut s = ThreadSource::new();
        for _ in 0..100 {
            assert!((0.0..1.0).contains(&s.next_unit()));
        }
    }

    #[test]
    fn closure_source() {
        let mut n = 0.0;
        let mut s = FnSource(move || {
            n += 0.25;
            n
        });
        assert_eq!(s.next_unit(), 0.25);
        assert_eq!(s.next_unit(), 0.5);
    }

    #[test]
    fn count_reaches_both_bounds() {
        let range = CountRange::new(2, 5);
        let mut low = SequenceSource::new(vec![0.0]);
        let mut high = SequenceSource::new(vec![0.999_999]);
        assert_eq!(LayoutSampler::new(&mut low).count(range), 2);
        assert_eq!(LayoutSampler::new(&mut high).count(range), 5);
    }

    #[test]
    fn out_of_range_units_are_clamped() {
        let mut s = SequenceSource::new(vec![1.0, -0.5, f64::NAN]);
        let mut sampler = LayoutSampler::new(&mut s);
        assert!(sampler.unit() < 1.0);
        assert_eq!(sampler.unit(), 0.0);
        assert_eq!(sampler.unit(), 0.0);
    }

    #[test]
    fn in_range_and_centered_bounds() {
        let mut s = SequenceSource::new(vec![0.0, 0.999_999_9, 0.0, 0.999_999_9]);
        let mut sampler = LayoutSampler::new(&mut s);
        let r = SizeRange::new(3.0, 7.0);
        assert_eq!(sampler.in_range(r), 3.0);
        assert!(r.contains(sampler.in_range(r)));
        assert_eq!(sampler.centered(10.0), -5.0);
        assert!(sampler.centered(10.0) <= 5.0);
    }

    #[test]
    fn placement_draw_order() {
        let config = GeometryConfig {
            ground_width: 100.0,
            ground_depth: 50.0,
            building_width: SizeRange::new(1.0, 11.0),
            building_depth: SizeRange::new(2.0, 4.0),
            building_height: SizeRange::new(10.0, 20.0),
            ..GeometryConfig::default()
        };
        let mut s = SequenceSource::new(vec![0.5, 0.5, 0.5, 0.75, 0.25]);
        let p = LayoutSampler::new(&mut s).placement(&config);
        assert_eq!(p.width, 6.0);
        assert_eq!(p.depth, 3.0);
        assert_eq!(p.height, 15.0);
        assert_eq!(p.x, 25.0);
        assert_eq!(p.z, -12.5);
        assert_eq!(s.consumed(), 5);
    }
}
