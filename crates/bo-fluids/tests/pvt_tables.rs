//! Integration tests for tabulated PVT evaluation.

use bo_fluids::{
    CompVec, MiscibleTable, Phase, PhaseVec, PressurePoint, PvtError, PvtErrorKind, PvtModel,
    RegionTables, SaturatedPoint, SaturationState, TableRow,
};
use proptest::prelude::*;

const SAT: [(f64, f64, f64, f64); 3] = [
    // pressure [Pa], Rs, Bo, viscosity [Pa·s]
    (5.0e6, 20.0, 1.10, 1.2e-3),
    (1.0e7, 50.0, 1.20, 0.9e-3),
    (2.0e7, 110.0, 1.35, 0.7e-3),
];

fn rows(scale_b: f64) -> Vec<TableRow> {
    SAT.iter()
        .enumerate()
        .map(|(k, &(p, r, b, mu))| {
            let mut undersaturated = vec![PressurePoint {
                pressure: p + 1.0e7,
                b: b * scale_b * 0.97,
                viscosity: mu * 1.1,
            }];
            if k == SAT.len() - 1 {
                undersaturated.push(PressurePoint {
                    pressure: p + 2.0e7,
                    b: b * scale_b * 0.95,
                    viscosity: mu * 1.2,
                });
            }
            TableRow {
                saturated: SaturatedPoint {
                    pressure: p,
                    ratio: r,
                    b: b * scale_b,
                    viscosity: mu,
                },
                undersaturated,
            }
        })
        .collect()
}

/// Two regions with the same curve shape but different B levels.
fn live_oil() -> PvtModel {
    PvtModel::LiveOil(RegionTables::new(vec![
        MiscibleTable::new(0, rows(1.0)).unwrap(),
        MiscibleTable::new(1, rows(1.05)).unwrap(),
    ]))
}

/// Surface volumes giving a dissolved-gas ratio of `rs`.
fn oil_with_rs(rs: f64) -> CompVec {
    CompVec::new(0.0, 1.0, rs)
}

#[test]
fn saturated_anchors_are_reproduced_exactly() {
    let model = live_oil();
    for &(p, r, b, mu) in &SAT {
        let props = model.evaluate(0, p, &oil_with_rs(r)).unwrap();
        assert_eq!(props.state, SaturationState::Saturated);
        assert_eq!(props.b, b);
        assert_eq!(props.r, r);
        assert_eq!(props.viscosity, mu);
    }
}

#[test]
fn saturated_derivatives_match_segment_slopes() {
    let model = live_oil();
    for pair in SAT.windows(2) {
        let (p0, r0, b0, mu0) = pair[0];
        let (p1, r1, b1, mu1) = pair[1];
        let mid = 0.5 * (p0 + p1);
        // Free gas everywhere: always on the saturated curve.
        let props = model.evaluate(0, mid, &CompVec::new(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(props.state, SaturationState::Saturated);
        assert_eq!(props.db_dp, (b1 - b0) / (p1 - p0));
        assert_eq!(props.dr_dp, (r1 - r0) / (p1 - p0));
        assert_eq!(props.dviscosity_dp, (mu1 - mu0) / (p1 - p0));
    }
}

#[test]
fn undersaturated_derivatives_match_branch_slopes() {
    let model = live_oil();
    for &(p, r, b, _) in &SAT {
        let above = p + 0.5e7;
        let props = model.evaluate(0, above, &oil_with_rs(r)).unwrap();
        assert_eq!(props.state, SaturationState::Undersaturated);
        assert_eq!(props.db_dp, (b * 0.97 - b) / 1.0e7);
        assert_eq!(props.dr_dp, 0.0);
    }
}

#[test]
fn ratio_between_branches_interpolates_b_monotonically() {
    let model = live_oil();
    let table = rows(1.05);
    let pressure = 2.2e7;
    // Rs halfway between branch 1 (50) and branch 2 (110).
    let props = model.evaluate(1, pressure, &oil_with_rs(80.0)).unwrap();
    assert_eq!(props.state, SaturationState::Undersaturated);

    let branch_b = |row: &TableRow| {
        let anchor = row.saturated;
        let next = row.undersaturated[0];
        let w = (pressure - anchor.pressure) / (next.pressure - anchor.pressure);
        (1.0 - w) * anchor.b + w * next.b
    };
    let b_lo = branch_b(&table[1]);
    let b_hi = branch_b(&table[2]);
    let (min, max) = (b_lo.min(b_hi), b_lo.max(b_hi));
    assert!(min < props.b && props.b < max, "{min} < {} < {max}", props.b);
}

#[test]
fn ratio_below_table_clamps_to_first_branch() {
    let model = live_oil();
    let p = 1.2e7;
    let clamped = model.evaluate(0, p, &oil_with_rs(1.0)).unwrap();
    let first = model.evaluate(0, p, &oil_with_rs(SAT[0].1)).unwrap();
    assert_eq!(clamped.b, first.b);
    assert_eq!(clamped.viscosity, first.viscosity);
    assert_eq!(clamped.r, 1.0);
}

#[test]
fn errors_are_classified() {
    let model = live_oil();
    assert!(matches!(
        model.evaluate(2, 1.0e7, &oil_with_rs(10.0)),
        Err(PvtError::RegionOutOfRange { region: 2, regions: 2 })
    ));
    assert!(matches!(
        model.evaluate(0, -5.0, &oil_with_rs(10.0)),
        Err(PvtError::NegativePressure { .. })
    ));
    let err = model
        .evaluate(0, f64::INFINITY, &oil_with_rs(10.0))
        .unwrap_err();
    assert_eq!(err.kind(), PvtErrorKind::Domain);
    let err = model
        .evaluate(0, 1.0e7, &CompVec::new(0.0, f64::NAN, 1.0))
        .unwrap_err();
    assert!(matches!(err, PvtError::NonFinite { .. }));
    let batch = model.b_batch(
        &[0],
        &[PhaseVec::uniform(1.0e7)],
        &[CompVec::new(0.0, -1.0, 1.0)],
        Phase::Liquid,
    );
    assert!(matches!(batch, Err(PvtError::NegativeSurfaceVolume { .. })));
}

/// Wet gas: ratio is surface oil per surface gas.
fn live_gas() -> PvtModel {
    let row = |p: f64, rv: f64, b: f64, mu: f64| TableRow {
        saturated: SaturatedPoint {
            pressure: p,
            ratio: rv,
            b,
            viscosity: mu,
        },
        undersaturated: vec![PressurePoint {
            pressure: p + 1.0e7,
            b: b * 0.8,
            viscosity: mu * 1.1,
        }],
    };
    PvtModel::LiveGas(RegionTables::new(vec![
        MiscibleTable::new(
            0,
            vec![
                row(5.0e6, 1.0e-5, 0.020, 1.4e-5),
                row(1.0e7, 3.0e-5, 0.010, 1.6e-5),
                row(2.0e7, 5.0e-5, 0.005, 2.0e-5),
            ],
        )
        .unwrap(),
    ]))
}

#[test]
fn live_gas_lean_mixture_interpolates_between_branches() {
    let model = live_gas();
    let pressure = 1.2e7;
    // 2e-5 sm3 oil per sm3 gas: halfway between the first two branches and
    // leaner than the saturated Rv at this pressure.
    let surfvol = CompVec::new(0.0, 2.0e-5, 1.0);
    let props = model.evaluate(0, pressure, &surfvol).unwrap();
    assert_eq!(model.phase(), Phase::Vapour);
    assert_eq!(props.state, SaturationState::Undersaturated);
    assert_eq!(props.r, 2.0e-5);
    assert_eq!(props.dr_dp, 0.0);

    // Branch 0 runs 5e6 -> 1.5e7, branch 1 runs 1e7 -> 2e7.
    let w0 = (pressure - 5.0e6) / 1.0e7;
    let b0 = (1.0 - w0) * 0.020 + w0 * 0.016;
    let w1 = (pressure - 1.0e7) / 1.0e7;
    let b1 = (1.0 - w1) * 0.010 + w1 * 0.008;
    let expected = 0.5 * b0 + 0.5 * b1;
    assert!((props.b - expected).abs() < 1e-15, "{} vs {expected}", props.b);

    // Rich gas lands on the saturated curve.
    let rich = model.evaluate(0, pressure, &CompVec::new(0.0, 1.0, 1.0)).unwrap();
    assert_eq!(rich.state, SaturationState::Saturated);
    assert!((rich.r - 3.4e-5).abs() < 1e-18);
}

fn cell_input() -> impl Strategy<Value = (usize, f64, f64)> {
    (0usize..2, 1.0e6f64..4.0e7, 0.0f64..200.0)
}

proptest! {
    #[test]
    fn batch_matches_scalar_for_any_order(
        (inputs, shuffled) in prop::collection::vec(cell_input(), 1..40)
            .prop_flat_map(|v| (Just(v.clone()), Just(v).prop_shuffle()))
    ) {
        let model = live_oil();
        for cells in [&inputs, &shuffled] {
            let regions: Vec<usize> = cells.iter().map(|c| c.0).collect();
            let pressures: Vec<PhaseVec> = cells.iter().map(|c| PhaseVec::uniform(c.1)).collect();
            let surfvol: Vec<CompVec> = cells.iter().map(|c| oil_with_rs(c.2)).collect();

            let batch = model
                .evaluate_batch(&regions, &pressures, &surfvol, Phase::Liquid)
                .unwrap();
            prop_assert_eq!(batch.len(), cells.len());
            for (i, got) in batch.iter().enumerate() {
                let want = model.evaluate(regions[i], pressures[i][Phase::Liquid], &surfvol[i]).unwrap();
                prop_assert_eq!(got.b.to_bits(), want.b.to_bits());
                prop_assert_eq!(got.db_dp.to_bits(), want.db_dp.to_bits());
                prop_assert_eq!(got.viscosity.to_bits(), want.viscosity.to_bits());
                prop_assert_eq!(got.r.to_bits(), want.r.to_bits());
            }
        }
    }

    #[test]
    fn derivative_matches_difference_quotient_within_segment(
        p in 5.5e6f64..9.5e6,
        h in 1.0e2f64..1.0e4,
    ) {
        // Both points stay inside the first saturated segment.
        let model = live_oil();
        let z = CompVec::new(0.0, 0.0, 1.0);
        let a = model.evaluate(0, p, &z).unwrap();
        let b = model.evaluate(0, p + h, &z).unwrap();
        let fd = (b.b - a.b) / h;
        prop_assert!((fd - a.db_dp).abs() <= 1e-6 * a.db_dp.abs());
    }
}
