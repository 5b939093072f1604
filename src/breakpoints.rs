//! Breakpoint Table
//!
//! Per-pollutant concentration → sub-index segments (India CPCB National AQI).
//! Index bands are contiguous: 0–50–100–200–300–400–500.
//!
//! Units: PM2.5, PM10, NO₂, SO₂, O₃ in µg/m³; CO in mg/m³.
//!
//! The "Severe" band is open-ended in the standard. Its upper concentration
//! only fixes the slope used for extrapolation: readings beyond it keep
//! rising linearly and are never capped at 500.

use crate::ranges::Pollutant;
use crate::utils::lerp;

/// One linear segment of a pollutant's breakpoint table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakpointSegment {
    pub conc_lo: f64,
    pub conc_hi: f64,
    pub index_lo: f64,
    pub index_hi: f64,
}

impl BreakpointSegment {
    const fn new(conc_lo: f64, conc_hi: f64, index_lo: f64, index_hi: f64) -> Self {
        Self { conc_lo, conc_hi, index_lo, index_hi }
    }

    /// Sub-index for `concentration` on this segment's line
    #[inline]
    pub fn sub_index(&self, concentration: f64) -> f64 {
        lerp(concentration, self.conc_lo, self.conc_hi, self.index_lo, self.index_hi)
    }
}

const SEGMENTS_PER_POLLUTANT: usize = 6;

type Segments = [BreakpointSegment; SEGMENTS_PER_POLLUTANT];

/// Build six contiguous segments from the seven concentration breakpoints
const fn cpcb(c: [f64; 7]) -> Segments {
    const INDEX: [f64; 7] = [0.0, 50.0, 100.0, 200.0, 300.0, 400.0, 500.0];
    [
        BreakpointSegment::new(c[0], c[1], INDEX[0], INDEX[1]),
        BreakpointSegment::new(c[1], c[2], INDEX[1], INDEX[2]),
        BreakpointSegment::new(c[2], c[3], INDEX[2], INDEX[3]),
        BreakpointSegment::new(c[3], c[4], INDEX[3], INDEX[4]),
        BreakpointSegment::new(c[4], c[5], INDEX[4], INDEX[5]),
        BreakpointSegment::new(c[5], c[6], INDEX[5], INDEX[6]),
    ]
}

/// Indexed by `Pollutant::index()`
static CPCB_TABLE: [Segments; 6] = [
    cpcb([0.0, 30.0, 60.0, 90.0, 120.0, 250.0, 380.0]),       // pm25
    cpcb([0.0, 50.0, 100.0, 250.0, 350.0, 430.0, 510.0]),     // pm10
    cpcb([0.0, 1.0, 2.0, 10.0, 17.0, 34.0, 51.0]),            // co
    cpcb([0.0, 40.0, 80.0, 180.0, 280.0, 400.0, 520.0]),      // no2
    cpcb([0.0, 40.0, 80.0, 380.0, 800.0, 1600.0, 2000.0]),    // so2
    cpcb([0.0, 50.0, 100.0, 168.0, 208.0, 748.0, 1000.0]),    // o3
];

/// Read-only view over the breakpoint segments
#[derive(Debug, Clone, Copy)]
pub struct BreakpointTable {
    table: &'static [Segments; 6],
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self::cpcb()
    }
}

impl BreakpointTable {
    pub fn cpcb() -> Self {
        Self { table: &CPCB_TABLE }
    }

    pub fn segments(&self, pollutant: Pollutant) -> &[BreakpointSegment] {
        &self.table[pollutant.index()]
    }

    /// Segment containing `concentration`.
    ///
    /// Intervals are half-open `[conc_lo, conc_hi)`, the first one closed at
    /// zero. Anything at or above the last breakpoint resolves to the last
    /// segment, which is then extrapolated.
    pub fn segment_for(&self, pollutant: Pollutant, concentration: f64) -> &BreakpointSegment {
        let segments = self.segments(pollutant);
        segments
            .iter()
            .rposition(|s| concentration >= s.conc_lo)
            .map(|i| &segments[i])
            .unwrap_or(&segments[0])
    }

    pub fn sub_index(&self, pollutant: Pollutant, concentration: f64) -> f64 {
        self.segment_for(pollutant, concentration).sub_index(concentration)
    }
}
