//! Stand-in for the windowed ROOT (`TApplication`/`TCanvas`/`TMultiGraph`)
//! plotting the original links against. There is no GUI/plotting crate
//! anywhere in the example pack to ground a windowed implementation in, and
//! spec §1 treats the plotter as an external collaborator described only by
//! its interface — so this renders the same data as a sorted textual table
//! instead of opening a window.

use crate::io::BinderCumulantCurve;

/// Equivalent of a single-curve `TGraph` draw: one (β, U₄) table.
pub fn display_curve(title: &str, betas: &[f64], binder_cumulants: &[f64]) {
    println!("{title}");
    println!("{:>10} | {:>12}", "beta", "U4");
    for (beta, u4) in betas.iter().zip(binder_cumulants.iter()) {
        println!("{:>10.4} | {:>12.6}", beta, u4);
    }
}

/// Equivalent of `TMultiGraph` with one entry per loaded curve (the
/// multi-file load-and-plot modes), plus a crude crossing-point note: the β
/// at which two curves' U₄ values are closest, the textual analogue of
/// eyeballing a curve-crossing plot for β_c.
pub fn display_multi_curve(title: &str, curves: &[(String, BinderCumulantCurve)]) {
    println!("{title}");
    for (legend, curve) in curves {
        println!("-- {legend} (L={}) --", curve.ising_l);
        println!("{:>10} | {:>12}", "beta", "U4");
        for (beta, u4) in curve.betas.iter().zip(curve.binder_cumulants.iter()) {
            println!("{:>10.4} | {:>12.6}", beta, u4);
        }
    }

    if let Some((beta, a_legend, b_legend)) = closest_crossing(curves) {
        println!(
            "approximate crossing between '{a_legend}' and '{b_legend}' near beta = {beta:.4}"
        );
    }
}

fn closest_crossing(curves: &[(String, BinderCumulantCurve)]) -> Option<(f64, String, String)> {
    let mut best: Option<(f64, f64, String, String)> = None;
    for i in 0..curves.len() {
        for j in (i + 1)..curves.len() {
            let (legend_a, curve_a) = &curves[i];
            let (legend_b, curve_b) = &curves[j];
            for (beta_a, u4_a) in curve_a.betas.iter().zip(curve_a.binder_cumulants.iter()) {
                for (beta_b, u4_b) in curve_b.betas.iter().zip(curve_b.binder_cumulants.iter()) {
                    if (beta_a - beta_b).abs() > 1e-9 {
                        continue;
                    }
                    let gap = (u4_a - u4_b).abs();
                    if best.as_ref().map(|(_, best_gap, _, _)| gap < *best_gap).unwrap_or(true) {
                        best = Some((*beta_a, gap, legend_a.clone(), legend_b.clone()));
                    }
                }
            }
        }
    }
    best.map(|(beta, _, a, b)| (beta, a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_the_beta_with_the_smallest_u4_gap() {
        let curve_a = BinderCumulantCurve {
            ising_l: 20,
            betas: vec![0.44, 0.45],
            binder_cumulants: vec![0.60, 0.61],
        };
        let curve_b = BinderCumulantCurve {
            ising_l: 40,
            betas: vec![0.44, 0.45],
            binder_cumulants: vec![0.601, 0.70],
        };
        let curves = vec![("L20".to_string(), curve_a), ("L40".to_string(), curve_b)];
        let (beta, a, b) = closest_crossing(&curves).unwrap();
        assert!((beta - 0.44).abs() < 1e-9);
        assert_eq!(a, "L20");
        assert_eq!(b, "L40");
    }

    #[test]
    fn no_crossing_when_betas_never_align() {
        let curve_a = BinderCumulantCurve {
            ising_l: 20,
            betas: vec![0.44],
            binder_cumulants: vec![0.60],
        };
        let curve_b = BinderCumulantCurve {
            ising_l: 40,
            betas: vec![0.45],
            binder_cumulants: vec![0.61],
        };
        let curves = vec![("L20".to_string(), curve_a), ("L40".to_string(), curve_b)];
        assert!(closest_crossing(&curves).is_none());
    }
}
