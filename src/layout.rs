//! Sector geometry: weighted items to angular spans, pointer angle to
//! sector index.

use serde::{Deserialize, Serialize};

use crate::WheelError;

/// Weight applied when an item carries no usable weight of its own.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// One entry on the wheel. Identity is positional: duplicate labels are
/// allowed and distinguished only by index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub color: String,
}

impl Item {
    pub fn new(label: impl Into<String>, weight: Option<f64>, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            weight,
            color: color.into(),
        }
    }
}

/// The single place the weight fallback lives. Layout, percentage display
/// and CSV export all read weights through here so they can never diverge.
pub fn effective_weight(item: &Item) -> f64 {
    match item.weight {
        Some(w) if w.is_finite() && w > 0.0 => w,
        _ => DEFAULT_WEIGHT,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub start_deg: f64,
    pub span_deg: f64,
}

impl Sector {
    pub fn end_deg(&self) -> f64 {
        (self.start_deg + self.span_deg) % 360.0
    }

    pub fn midpoint_deg(&self) -> f64 {
        normalize_deg(self.start_deg + self.span_deg / 2.0)
    }
}

/// Derived angular layout: one contiguous sector per item, spans
/// proportional to effective weight, summing to 360.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorLayout {
    sectors: Vec<Sector>,
}

impl SectorLayout {
    pub fn compute(items: &[Item]) -> Result<Self, WheelError> {
        if items.is_empty() {
            return Err(WheelError::EmptyWheel);
        }
        let total: f64 = items.iter().map(effective_weight).sum();
        let mut sectors = Vec::with_capacity(items.len());
        let mut start = 0.0;
        for item in items {
            let span = effective_weight(item) / total * 360.0;
            sectors.push(Sector {
                start_deg: start,
                span_deg: span,
            });
            start += span;
        }
        Ok(Self { sectors })
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn sector(&self, index: usize) -> Option<&Sector> {
        self.sectors.get(index)
    }

    /// Maps a normalized layout angle to the sector that owns it.
    ///
    /// Intervals are half-open `[start, end)`, so on a shared boundary the
    /// sector that starts there wins. A sector whose end wraps past 360
    /// matches `angle >= start || angle < end`. If floating-point drift
    /// leaves a hairline gap and nothing matches, the result is index 0 —
    /// a deliberate, deterministic fallback that keeps this function total.
    /// (A single 360-degree sector resolves through that same fallback:
    /// its half-open interval is empty after the modulo.)
    pub fn sector_at(&self, angle_deg: f64) -> usize {
        let angle = normalize_deg(angle_deg);
        for (i, sector) in self.sectors.iter().enumerate() {
            let end = sector.end_deg();
            let hit = if sector.start_deg <= end {
                angle >= sector.start_deg && angle < end
            } else {
                // Sector straddles the 0/360 seam.
                angle >= sector.start_deg || angle < end
            };
            if hit {
                return i;
            }
        }
        0
    }
}

/// Normalizes an angle into `[0, 360)`.
pub fn normalize_deg(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Layout angle currently under the fixed pointer.
///
/// The pointer sits at the wheel's 0-degree reference (3 o'clock). The
/// wheel rotates clockwise by `rotation_deg`, which sweeps the pointer
/// counter-clockwise across the stationary layout, hence the inversion.
/// Getting this sign wrong silently reverses which item wins.
pub fn pointer_angle(rotation_deg: f64) -> f64 {
    normalize_deg(360.0 - normalize_deg(rotation_deg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(label: &str, weight: f64) -> Item {
        Item::new(label, Some(weight), "#FF6B6B")
    }

    #[test]
    fn spans_sum_to_full_circle() {
        let items = vec![item("a", 0.3), item("b", 2.0), item("c", 7.5), item("d", 1.0)];
        let layout = SectorLayout::compute(&items).unwrap();
        let sum: f64 = layout.sectors().iter().map(|s| s.span_deg).sum();
        assert!((sum - 360.0).abs() < 1e-6, "sum was {sum}");
    }

    #[test]
    fn equal_and_double_weights() {
        let items = vec![item("A", 1.0), item("B", 1.0), item("C", 2.0)];
        let layout = SectorLayout::compute(&items).unwrap();
        let spans: Vec<f64> = layout.sectors().iter().map(|s| s.span_deg).collect();
        let starts: Vec<f64> = layout.sectors().iter().map(|s| s.start_deg).collect();
        assert_eq!(spans, vec![90.0, 90.0, 180.0]);
        assert_eq!(starts, vec![0.0, 90.0, 180.0]);
        assert_eq!(layout.sector_at(200.0), 2);
        // Boundary angle belongs to the sector that starts there.
        assert_eq!(layout.sector_at(90.0), 1);
        assert_eq!(layout.sector_at(0.0), 0);
    }

    #[test]
    fn degree_sweep_is_a_partition() {
        let items = vec![item("a", 1.0), item("b", 3.0), item("c", 0.5), item("d", 2.0)];
        let layout = SectorLayout::compute(&items).unwrap();
        for deg in 0..360 {
            let angle = deg as f64;
            let hits = layout
                .sectors()
                .iter()
                .filter(|s| {
                    let end = s.end_deg();
                    if s.start_deg <= end {
                        angle >= s.start_deg && angle < end
                    } else {
                        angle >= s.start_deg || angle < end
                    }
                })
                .count();
            assert_eq!(hits, 1, "angle {angle} matched {hits} sectors");
            let idx = layout.sector_at(angle);
            assert!(idx < layout.len());
        }
    }

    #[test]
    fn single_item_spans_everything() {
        let items = vec![item("Only", 5.0)];
        let layout = SectorLayout::compute(&items).unwrap();
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.sectors()[0].start_deg, 0.0);
        assert_eq!(layout.sectors()[0].span_deg, 360.0);
        for deg in [0.0, 1.0, 90.0, 180.0, 359.9] {
            assert_eq!(layout.sector_at(deg), 0);
        }
    }

    #[test]
    fn empty_list_is_an_error() {
        assert!(matches!(
            SectorLayout::compute(&[]),
            Err(WheelError::EmptyWheel)
        ));
    }

    #[test]
    fn invalid_weights_fall_back_to_one() {
        assert_eq!(effective_weight(&item("z", -3.0)), DEFAULT_WEIGHT);
        assert_eq!(effective_weight(&item("z", 0.0)), DEFAULT_WEIGHT);
        assert_eq!(effective_weight(&item("z", f64::NAN)), DEFAULT_WEIGHT);
        assert_eq!(effective_weight(&item("z", f64::INFINITY)), DEFAULT_WEIGHT);
        assert_eq!(effective_weight(&Item::new("z", None, "red")), DEFAULT_WEIGHT);
        assert_eq!(effective_weight(&item("z", 2.5)), 2.5);
    }

    #[test]
    fn layout_is_deterministic() {
        let items = vec![item("a", 1.2), item("b", 3.4)];
        let a = SectorLayout::compute(&items).unwrap();
        let b = SectorLayout::compute(&items).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.sector_at(123.456), b.sector_at(123.456));
    }

    #[test]
    fn normalization_handles_negatives_and_wrap() {
        assert_eq!(normalize_deg(-90.0), 270.0);
        assert_eq!(normalize_deg(720.0), 0.0);
        assert_eq!(normalize_deg(365.0), 5.0);
    }

    #[test]
    fn pointer_inversion() {
        // No rotation: pointer reads the layout's own zero.
        assert_eq!(pointer_angle(0.0), 0.0);
        // A quarter clockwise turn puts the 270-degree sector under the
        // pointer, not the 90-degree one.
        assert_eq!(pointer_angle(90.0), 270.0);
        assert_eq!(pointer_angle(360.0 * 7.0 + 45.0), 315.0);
    }
}
