//! End-to-end properties of estimation, transform and decomposition on
//! synthetic global networks.

use helmert_core::synthetic::network::{global_network, offset_frame, regional_network};
use helmert_core::synthetic::noise::UniformPositionNoise;
use helmert_core::{
    ErrorKind, ParameterConfig, ParameterName, ParameterSet, ParameterSpec, ParameterStatus,
    PairSelection, Pt3, Real, StationFrame, TransformType, Vec3,
};
use helmert_linear::{
    estimate_from_pairs, estimate_parameters, frame_residuals, observation_vector,
    resolve_constraints, solve_ordinary, solve_weighted, transform_frame, DesignColumns,
    EstimationSettings, LeastSquaresOptions, Uen,
};
use nalgebra::DVector;

fn settings(transform_type: TransformType) -> EstimationSettings {
    EstimationSettings {
        transform_type,
        ..Default::default()
    }
}

fn estimate(from: &StationFrame, to: &StationFrame, s: &EstimationSettings) -> ParameterSet {
    estimate_parameters(&from.positions(), &to.positions(), None, s).expect("estimation")
}

fn assert_rel(name: ParameterName, got: Real, want: Real, rel: Real) {
    let err = (got - want).abs();
    assert!(
        err <= rel * want.abs(),
        "{name}: got {got:e}, want {want:e}, rel err {:e}",
        err / want.abs()
    );
}

#[test]
fn round_trip_recovers_nine_parameters() {
    let from = global_network(24, 0.005);
    let truth = ParameterSet::from_values([
        1.2, -0.8, 1.5, 2e-6, -1.5e-6, 1e-6, 3e-6, -2e-6, 1.5e-6,
    ]);
    let to = transform_frame(&truth, &from);

    let est = estimate(&from, &to, &settings(TransformType::Nine));
    for (name, p) in est.iter() {
        assert_rel(name, p.value, truth.value(name), 1e-9);
        assert_eq!(p.status, ParameterStatus::Estimated);
    }
}

#[test]
fn uniform_offset_is_recovered_as_translation() {
    let from = global_network(24, 0.005);
    let to = offset_frame(&from, Vec3::new(0.01, 0.01, 0.01));

    let est = estimate(&from, &to, &settings(TransformType::Seven));
    for name in [
        ParameterName::TranslationX,
        ParameterName::TranslationY,
        ParameterName::TranslationZ,
    ] {
        let v = est.value(name);
        assert!((v - 0.01).abs() < 1e-9, "{name} = {v}");
    }
    for name in ParameterName::ALL.iter().skip(3) {
        let v = est.value(*name);
        assert!(v.abs() < 1e-9, "{name} = {v}");
    }
}

#[test]
fn least_squares_residual_is_orthogonal_to_design() {
    let from = global_network(30, 0.005);
    let truth = ParameterSet::from_values([0.01, 0.02, -0.01, 1e-8, 1e-8, 1e-8, 0.0, 5e-9, 0.0]);
    let noise = UniformPositionNoise {
        seed: 11,
        max_abs: 0.003,
    };
    let to = noise.apply_frame(&transform_frame(&truth, &from));

    let columns = DesignColumns::from_points(&from.positions());
    let b = observation_vector(&from.positions(), &to.positions()).unwrap();
    let system = resolve_constraints(
        &columns,
        &b,
        &ParameterConfig::all_estimated(),
        TransformType::Seven,
    )
    .unwrap();
    let sol = solve_ordinary(&system.design, &system.observations, &LeastSquaresOptions::default())
        .unwrap();

    let r = &system.observations - &system.design * &sol.values;
    let g = system.design.tr_mul(&r);
    for (j, gj) in g.iter().enumerate() {
        let scale = system.design.column(j).norm() * system.observations.norm();
        assert!(gj.abs() <= 1e-12 * scale, "column {j}: {gj:e} vs {scale:e}");
    }
}

#[test]
fn uniform_weights_match_ordinary_solution() {
    let from = global_network(20, 0.005);
    let noise = UniformPositionNoise {
        seed: 5,
        max_abs: 0.004,
    };
    let to = noise.apply_frame(&offset_frame(&from, Vec3::new(0.02, -0.01, 0.005)));

    let columns = DesignColumns::from_points(&from.positions());
    let b = observation_vector(&from.positions(), &to.positions()).unwrap();
    let system = resolve_constraints(
        &columns,
        &b,
        &ParameterConfig::all_estimated(),
        TransformType::Nine,
    )
    .unwrap();

    let opts = LeastSquaresOptions::default();
    let ols = solve_ordinary(&system.design, &system.observations, &opts).unwrap();
    let variances = DVector::from_element(system.num_equations(), 2.5e-5);
    let wls = solve_weighted(&system.design, &system.observations, &variances, &opts).unwrap();

    for j in 0..system.num_unknowns() {
        let (a, w) = (ols.values[j], wls.values[j]);
        assert!(
            (a - w).abs() <= 1e-9 * a.abs() + 1e-14,
            "{}: ols {a:e} wls {w:e}",
            system.unknowns[j].name
        );
    }
    assert!(ols.sigmas.is_none());
    assert_eq!(wls.sigmas.map(|s| s.len()), Some(9));
}

#[test]
fn full_lock_depends_only_on_fixed_values() {
    let from = global_network(10, 0.005);
    let unrelated = UniformPositionNoise {
        seed: 99,
        max_abs: 50.0,
    }
    .apply_frame(&from);
    let values = [0.1, -0.2, 0.05, 1e-8, 2e-8, -1e-8, 1e-9, 0.0, -2e-9];
    let s = EstimationSettings {
        parameters: ParameterConfig::all_fixed(values),
        ..Default::default()
    };

    let est = estimate(&from, &unrelated, &s);
    assert_eq!(est, ParameterSet::from_values(values));
    assert_eq!(
        transform_frame(&est, &from),
        transform_frame(&ParameterSet::from_values(values), &from)
    );
}

#[test]
fn type_seven_scale_is_applied_equally() {
    let from = global_network(16, 0.005);
    let truth = ParameterSet::from_values([0.0, 0.0, 0.0, 4e-8, 4e-8, 4e-8, 0.0, 0.0, 0.0]);
    let to = transform_frame(&truth, &from);

    let est = estimate(&from, &to, &settings(TransformType::Seven));
    assert_eq!(est.scale_x.value, est.scale_y.value);
    assert_eq!(est.scale_x.value, est.scale_z.value);

    let back = transform_frame(&est, &from);
    for (a, b) in back.iter().zip(to.iter()) {
        assert!((a.position - b.position).norm() < 1e-8, "station {}", a.id);
    }
}

#[test]
fn type_eight_separates_z_scale() {
    let from = global_network(20, 0.005);
    let truth = ParameterSet::from_values([0.0, 0.0, 0.0, 5e-8, 5e-8, -3e-8, 0.0, 0.0, 0.0]);
    let to = transform_frame(&truth, &from);

    let est = estimate(&from, &to, &settings(TransformType::Eight));
    assert_rel(ParameterName::ScaleX, est.scale_x.value, 5e-8, 1e-6);
    assert_eq!(est.scale_x.value, est.scale_y.value);
    assert_rel(ParameterName::ScaleZ, est.scale_z.value, -3e-8, 1e-6);
}

#[test]
fn fixing_some_parameters_uses_their_values() {
    let from = global_network(20, 0.005);
    let truth = ParameterSet::from_values([0.03, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2e-8]);
    let to = transform_frame(&truth, &from);

    let config = ParameterConfig::all_estimated()
        .with(ParameterName::RotationZ, ParameterSpec::Fixed(2e-8));
    let s = EstimationSettings {
        transform_type: TransformType::Nine,
        parameters: config,
        ..Default::default()
    };
    let est = estimate(&from, &to, &s);
    assert_eq!(est.rotation_z.status, ParameterStatus::Fixed);
    assert_eq!(est.rotation_z.value, 2e-8);
    assert!((est.translation_x.value - 0.03).abs() < 1e-9);
}

#[test]
fn weighted_pairs_carry_uncertainties() {
    let to = global_network(20, 0.004);
    let from = UniformPositionNoise {
        seed: 3,
        max_abs: 0.002,
    }
    .apply_frame(&offset_frame(&to, Vec3::new(-0.01, 0.0, 0.0)));

    let selection = PairSelection::from_frames(&from, &to).unwrap();
    let pairs = selection.selected();
    let est = estimate_from_pairs(&pairs, true, &settings(TransformType::Seven)).unwrap();

    assert!((est.translation_x.value - 0.01).abs() < 2e-3);
    for (name, p) in est.iter() {
        let sigma = p.sigma.unwrap_or_else(|| panic!("{name} has no sigma"));
        assert!(sigma > 0.0 && sigma.is_finite());
    }
    assert_eq!(est.scale_x.sigma, est.scale_z.sigma);
}

#[test]
fn clustered_single_point_geometry_is_rejected() {
    let base = Pt3::new(4_000_000.0, 3_000_000.0, 3_500_000.0);
    let from: StationFrame = (0..6)
        .map(|i| helmert_core::Station::new(format!("P{i}"), base, Vec3::zeros()))
        .collect();
    let to = offset_frame(&from, Vec3::new(0.01, 0.0, 0.0));

    let err = estimate_parameters(
        &from.positions(),
        &to.positions(),
        None,
        &settings(TransformType::Seven),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Numerical);
}

#[test]
fn regional_network_is_still_solvable() {
    let from = regional_network(15, 0.2, 0.9, 0.2, 0.005);
    let truth = ParameterSet::from_values([0.01, -0.02, 0.015, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
    let to = transform_frame(&truth, &from);
    let est = estimate(&from, &to, &settings(TransformType::Seven));
    assert!((est.translation() - truth.translation()).norm() < 1e-5);
}

#[test]
fn zero_differences_decompose_to_zero() {
    let frame = global_network(40, 0.005);
    for r in frame_residuals(&frame, &frame) {
        assert_eq!(r.uen, Uen::default(), "station {}", r.id);
    }
}

#[test]
fn fitted_residuals_shrink_after_transform() {
    let from = global_network(24, 0.005);
    let truth = ParameterSet::from_values([0.05, -0.03, 0.02, 2e-8, 2e-8, 2e-8, 1e-8, 0.0, -1e-8]);
    let to = UniformPositionNoise {
        seed: 17,
        max_abs: 0.001,
    }
    .apply_frame(&transform_frame(&truth, &from));

    let est = estimate(&from, &to, &settings(TransformType::Seven));
    let transformed = transform_frame(&est, &from);

    let rms = |res: Vec<helmert_linear::StationResidual>| {
        (res.iter().map(|r| r.delta.norm_squared()).sum::<Real>() / res.len() as Real).sqrt()
    };
    let before = rms(frame_residuals(&from, &to));
    let after = rms(frame_residuals(&transformed, &to));
    assert!(after < 0.002, "rms after {after}");
    assert!(after < before / 10.0, "before {before}, after {after}");
}
