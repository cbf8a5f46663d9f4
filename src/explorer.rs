//! Complex permittivity explorer form
//!
//! Reads three free-text fields (relative permittivity, conductivity,
//! frequency in GHz). Text that does not parse keeps the previous value.

use serde::{Deserialize, Serialize};

use crate::input::parse_or;
use crate::sim::{Permittivity, complex_permittivity};

/// Plot extents of the complex plane, in relative permittivity units
pub const PLOT_MAX_REAL: f64 = 100.0;
pub const PLOT_MAX_IMAG: f64 = 20.0;
/// Share of an extent past which the marker is pinned to the edge
pub const EDGE_THRESHOLD: f64 = 0.98;

/// Marker position as percentages of the plot area (origin bottom-left)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    pub x_pct: f64,
    pub y_pct: f64,
    pub at_max_real: bool,
    pub at_max_imag: bool,
    pub at_origin: bool,
}

impl PlotPoint {
    pub fn new(real: f64, imag: f64) -> Self {
        let r = real.clamp(0.0, PLOT_MAX_REAL);
        let i = imag.clamp(0.0, PLOT_MAX_IMAG);
        Self {
            x_pct: r / PLOT_MAX_REAL * 100.0,
            y_pct: i / PLOT_MAX_IMAG * 100.0,
            at_max_real: r >= PLOT_MAX_REAL * EDGE_THRESHOLD,
            at_max_imag: i >= PLOT_MAX_IMAG * EDGE_THRESHOLD,
            at_origin: r < 0.01 * PLOT_MAX_REAL && i < 0.01 * PLOT_MAX_IMAG,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerResult {
    pub eps_r: f64,
    pub sigma: f64,
    pub freq_ghz: f64,
    pub permittivity: Permittivity,
    /// `None` when the frequency is not positive
    pub plot: Option<PlotPoint>,
}

impl ExplorerResult {
    /// Angular frequency for display, "N/A" without a valid frequency
    pub fn omega_text(&self) -> String {
        if self.permittivity.class.is_some() {
            format!("{:.3e}", self.permittivity.omega)
        } else {
            "N/A".to_owned()
        }
    }

    /// ε'/ε0
    pub fn eps_prime_text(&self) -> String {
        format!("{:.3}", self.permittivity.eps_prime)
    }

    /// ε''/ε0, "Infinity" without a valid frequency
    pub fn eps_double_prime_text(&self) -> String {
        if self.permittivity.eps_double_prime.is_finite() {
            format!("{:.4}", self.permittivity.eps_double_prime)
        } else {
            "Infinity".to_owned()
        }
    }

    /// εc/ε0 as "a + bj"
    pub fn complex_text(&self) -> String {
        let p = &self.permittivity;
        if p.eps_double_prime.is_finite() {
            format!("{:.3} + {:.4}j", p.eps_prime, p.eps_double_prime)
        } else {
            format!("{:.3} + ∞ j", p.eps_prime)
        }
    }

    pub fn interpretation(&self) -> &'static str {
        match self.permittivity.class {
            Some(class) => class.label(),
            None => "Freq > 0 needed.",
        }
    }
}

/// Form state: the last accepted value of each field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explorer {
    pub eps_r: f64,
    pub sigma: f64,
    pub freq_ghz: f64,
}

impl Default for Explorer {
    fn default() -> Self {
        Self {
            eps_r: 4.0,
            sigma: 0.02,
            freq_ghz: 4.0,
        }
    }
}

impl Explorer {
    /// Parse the three fields and recompute
    pub fn update(&mut self, eps_r: &str, sigma: &str, freq_ghz: &str) -> ExplorerResult {
        self.eps_r = parse_or(eps_r, self.eps_r);
        self.sigma = parse_or(sigma, self.sigma);
        self.freq_ghz = parse_or(freq_ghz, self.freq_ghz);
        self.result()
    }

    pub fn result(&self) -> ExplorerResult {
        let permittivity = complex_permittivity(self.eps_r, self.sigma, self.freq_ghz);
        let plot = permittivity
            .is_plottable()
            .then(|| PlotPoint::new(permittivity.eps_prime, permittivity.eps_double_prime));
        ExplorerResult {
            eps_r: self.eps_r,
            sigma: self.sigma,
            freq_ghz: self.freq_ghz,
            permittivity,
            plot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::LossClass;

    #[test]
    fn test_bad_text_keeps_previous_values() {
        let mut explorer = Explorer::default();
        explorer.update("10", "0.5", "2");
        let result = explorer.update("ten", "", "2.5");
        assert_eq!(result.eps_r, 10.0);
        assert_eq!(result.sigma, 0.5);
        assert_eq!(result.freq_ghz, 2.5);
    }

    #[test]
    fn test_zero_frequency_has_no_plot_point() {
        let mut explorer = Explorer::default();
        let result = explorer.update("4", "0.02", "0");
        assert!(result.plot.is_none());
        assert_eq!(result.omega_text(), "N/A");
        assert_eq!(result.interpretation(), "Freq > 0 needed.");
        assert!(result.complex_text().ends_with("∞ j"));
        assert_eq!(result.eps_prime_text(), "4.000");
        assert_eq!(result.eps_double_prime_text(), "Infinity");
    }

    #[test]
    fn test_plot_point_clamps_and_flags() {
        let p = PlotPoint::new(150.0, 19.7);
        assert_eq!(p.x_pct, 100.0);
        assert!(p.at_max_real && p.at_max_imag && !p.at_origin);
        let p = PlotPoint::new(0.5, 0.1);
        assert!(p.at_origin);
        assert!((p.x_pct - 0.5).abs() < 1e-12);
        let p = PlotPoint::new(-3.0, -1.0);
        assert_eq!((p.x_pct, p.y_pct), (0.0, 0.0));
    }

    #[test]
    fn test_default_form_is_low_loss() {
        let result = Explorer::default().result();
        assert_eq!(result.permittivity.class, Some(LossClass::Low));
        let plot = result.plot.unwrap();
        assert!((plot.x_pct - 4.0).abs() < 1e-9);
        assert!(plot.y_pct > 0.0 && plot.y_pct < 1.0);
        assert!(result.complex_text().starts_with("4.000 + 0.0"));
        assert!(result.eps_double_prime_text().starts_with("0.0"));
        assert_eq!(result.eps_double_prime_text().len(), "0.0000".len());
    }
}
