//! TLB statistics collection and reporting.
//!
//! This module tracks activity counters for one TLB instance. It provides:
//! 1. **Lookups:** Searches, L1 hits, L2 hits, misses and the derived hit rate.
//! 2. **Faults:** Permission faults and aliasing (multiple match) faults.
//! 3. **Maintenance:** Writes per table, evictions of occupied ways, flushes.
//! 4. **Gating:** Cycles clocked while enabled and commands bypassed by `mode == 0`.

use std::fmt;

use serde::Serialize;

/// Counters collected by the TLB controller.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TlbStats {
    /// Clock edges taken while translation was enabled.
    pub ticks: u64,
    /// SEARCH commands issued.
    pub searches: u64,
    /// Searches answered by the set-associative L1.
    pub l1_hits: u64,
    /// Searches answered by the secondary table after an L1 miss.
    pub l2_hits: u64,
    /// Searches that found no translation.
    pub misses: u64,
    /// Hits whose access was denied by the permission validator.
    pub permission_faults: u64,
    /// Searches where several ways of a set matched.
    pub aliasing_faults: u64,
    /// WRITE_L1 commands.
    pub l1_writes: u64,
    /// WRITE_L2 commands accepted by a configured secondary table.
    pub l2_writes: u64,
    /// Writes that replaced an occupied way or slot.
    pub evictions: u64,
    /// Commands ignored because translation was disabled.
    pub bypassed: u64,
    /// Explicit flushes.
    pub flushes: u64,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"lookup"`, `"faults"`, `"maintenance"`.
/// Pass an empty slice to `render_sections` to render all sections.
pub const STATS_SECTIONS: &[&str] = &["lookup", "faults", "maintenance"];

impl TlbStats {
    /// Fraction of searches that hit in either table, in `0.0..=1.0`.
    ///
    /// Zero when no search has been issued.
    pub fn hit_rate(&self) -> f64 {
        if self.searches == 0 {
            return 0.0;
        }
        (self.l1_hits + self.l2_hits) as f64 / self.searches as f64
    }

    /// Serializes the counters to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates `serde_json` failures; plain integer counters never fail in practice.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Renders only the requested sections.
    ///
    /// # Arguments
    ///
    /// * `sections` - Section names from [`STATS_SECTIONS`], or empty for all.
    pub fn render_sections(&self, sections: &[&str]) -> String {
        let want = |s: &str| sections.is_empty() || sections.contains(&s);
        let searches = self.searches.max(1) as f64;
        let mut out = String::new();

        out.push_str("==========================================================\n");
        out.push_str("TLB STATISTICS\n");
        out.push_str("==========================================================\n");
        if want("lookup") {
            out.push_str(&format!("tlb.ticks                {}\n", self.ticks));
            out.push_str(&format!("tlb.searches             {}\n", self.searches));
            out.push_str(&format!(
                "tlb.l1_hits              {} ({:.2}%)\n",
                self.l1_hits,
                self.l1_hits as f64 / searches * 100.0
            ));
            out.push_str(&format!(
                "tlb.l2_hits              {} ({:.2}%)\n",
                self.l2_hits,
                self.l2_hits as f64 / searches * 100.0
            ));
            out.push_str(&format!("tlb.misses               {}\n", self.misses));
            out.push_str(&format!("tlb.hit_rate             {:.2}%\n", self.hit_rate() * 100.0));
            out.push_str("----------------------------------------------------------\n");
        }
        if want("faults") {
            out.push_str(&format!("fault.permission         {}\n", self.permission_faults));
            out.push_str(&format!("fault.aliasing           {}\n", self.aliasing_faults));
            out.push_str("----------------------------------------------------------\n");
        }
        if want("maintenance") {
            out.push_str(&format!("write.l1                 {}\n", self.l1_writes));
            out.push_str(&format!("write.l2                 {}\n", self.l2_writes));
            out.push_str(&format!("write.evictions          {}\n", self.evictions));
            out.push_str(&format!("tlb.flushes              {}\n", self.flushes));
            out.push_str(&format!("tlb.bypassed             {}\n", self.bypassed));
        }
        out.push_str("==========================================================\n");
        out
    }
}

impl fmt::Display for TlbStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_sections(&[]))
    }
}
