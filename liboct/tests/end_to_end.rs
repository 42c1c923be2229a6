//! End-to-end checks of the synthesis -> reconstruction -> compression chain

use oct_core::analysis::{locate_layers, peak_near};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use oct_core::generators::{layer_signal, Layer, WavenumberAxis};
use oct_core::reconstruction::{reconstruct_line, DepthAxis};
use oct_core::{simulate, OctConfig, OctError};

fn default_axes() -> (WavenumberAxis, DepthAxis) {
    let k = WavenumberAxis::from_wavelengths(820.0, 880.0, 1024);
    let z = DepthAxis::from_wavenumbers(&k);
    (k, z)
}

#[test]
fn noiseless_layers_on_exact_bins_reconstruct_cleanly() {
    let (k, z) = default_axes();
    // Depths picked from the depth axis itself, so each layer sits on a bin
    let layers = [Layer::new(50.0, z.values()[40]), Layer::new(5.0, z.values()[300])];
    let profile = reconstruct_line(&layer_signal(&k, &layers));

    assert!((profile[40] - 50.0).abs() < 1e-6, "bin 40 = {}", profile[40]);
    assert!((profile[300] - 5.0).abs() < 1e-6, "bin 300 = {}", profile[300]);
    for (i, &v) in profile.iter().enumerate() {
        if i != 40 && i != 300 {
            assert!(v < 1e-6 * 50.0, "unexpected energy at bin {}: {}", i, v);
        }
    }
}

#[test]
fn noiseless_default_layers_peak_at_nearest_bins() {
    let (k, z) = default_axes();
    let layers = [Layer::new(80.0, 60_000.0), Layer::new(8.0, 500_000.0)];
    let profile = reconstruct_line(&layer_signal(&k, &layers));

    let expected: Vec<usize> = layers
        .iter()
        .map(|l| z.bin_for_depth(l.depth).unwrap())
        .collect();
    let strongest = profile.iter().cloned().fold(0.0, f64::max);

    for &bin in &expected {
        let peak = peak_near(&profile, &z, bin, 4).unwrap();
        assert!(
            peak.bin.abs_diff(bin) <= 1,
            "peak at {} but layer maps to bin {}",
            peak.bin,
            bin
        );
    }

    // Away from the layers only spectral leakage remains
    for (i, &v) in profile.iter().enumerate() {
        if expected.iter().all(|&b| i.abs_diff(b) > 4) {
            assert!(v < 0.15 * strongest, "bin {} at {} vs peak {}", i, v, strongest);
        }
    }
}

#[test]
fn noiseless_layers_peak_near_expected_bin_across_sizes() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..40 {
        let n: usize = rng.gen_range(64..2048);
        let k = WavenumberAxis::from_wavelengths(820.0, 880.0, n);
        let z = DepthAxis::from_wavenumbers(&k);
        let half = n / 2;

        // Fractional bins keep clear of DC, the mirror image and each other
        let first = rng.gen_range(10.0..(half - 10) as f64);
        let mut layers = vec![Layer::new(10.0, first * z.resolution())];
        if half >= 60 {
            let second = loop {
                let f = rng.gen_range(10.0..(half - 10) as f64);
                if (f - first).abs() >= 20.0 {
                    break f;
                }
            };
            layers.push(Layer::new(rng.gen_range(3.0..10.0), second * z.resolution()));
        }

        let profile = reconstruct_line(&layer_signal(&k, &layers));
        assert_eq!(profile.len(), half);
        for layer in &layers {
            let expected = z.bin_for_depth(layer.depth).unwrap();
            let peak = peak_near(&profile, &z, expected, 2).unwrap();
            assert!(
                peak.bin.abs_diff(expected) <= 1,
                "N={}: peak at {} but layer maps to bin {}",
                n,
                peak.bin,
                expected
            );
        }
    }
}

#[test]
fn single_line_scenario_resolves_both_layers() {
    let out = simulate(OctConfig {
        noise_amp: 0.0,
        ..OctConfig::default()
    })
    .unwrap();

    assert_eq!(out.linear.shape(), (1, 512));
    let profile = out.linear.row(0);
    let layers = [Layer::new(80.0, 60_000.0), Layer::new(8.0, 500_000.0)];
    let peaks = locate_layers(profile, &out.depths, &layers, 2);

    let first = peaks[0].expect("first layer");
    let second = peaks[1].expect("second layer");
    assert!(first.bin.abs_diff(31) <= 1, "first peak at bin {}", first.bin);
    assert!(second.bin.abs_diff(261) <= 1, "second peak at bin {}", second.bin);
    // Depth ratio carries over to bin ratio
    let bin_ratio = second.bin as f64 / first.bin as f64;
    assert!((bin_ratio - 500_000.0 / 60_000.0).abs() < 0.5, "bin ratio {}", bin_ratio);

    let ratio = first.magnitude / second.magnitude;
    assert!(ratio > 7.0 && ratio < 15.0, "amplitude ratio {}", ratio);
}

#[test]
fn bscan_global_image_spans_full_range() {
    let out = simulate(OctConfig::bscan()).unwrap();
    assert_eq!(out.global_8bit.shape(), (100, 512));

    let log = out.log.as_slice();
    let px = out.global_8bit.as_slice();

    let max_db = log.iter().cloned().filter(|v| v.is_finite()).fold(f64::NEG_INFINITY, f64::max);
    let at_max: Vec<usize> = (0..log.len()).filter(|&i| log[i] == max_db).collect();
    assert_eq!(at_max.len(), 1, "global maximum must be a single pixel");
    assert_eq!(px[at_max[0]], 255);

    assert!(px.contains(&0));
    assert!(px.contains(&255));
}

#[test]
fn bscan_truncated_image_is_bounded() {
    let out = simulate(OctConfig::bscan()).unwrap();
    let c = OctConfig::default().compression;
    for (&db, &p) in out.log.as_slice().iter().zip(out.truncated_8bit.as_slice()) {
        if db <= c.floor_db {
            assert_eq!(p, 0);
        } else if db >= c.floor_db + c.range_db {
            assert_eq!(p, 255);
        }
    }
}

#[test]
fn bscan_lines_differ_but_share_structure() {
    let out = simulate(OctConfig::bscan()).unwrap();
    assert_ne!(out.raw_8bit.row(0), out.raw_8bit.row(1));

    // Every line still shows the strong layer near bin 31
    for row in out.linear.iter_rows() {
        let peak = peak_near(row, &out.depths, 31, 2).unwrap();
        assert!(peak.magnitude > 40.0, "weak layer peak {}", peak.magnitude);
    }
}

#[test]
fn empty_scene_is_degenerate() {
    let err = simulate(OctConfig {
        layers: Vec::new(),
        noise_amp: 0.0,
        ..OctConfig::default()
    })
    .unwrap_err();
    assert_eq!(err, OctError::DegenerateInput { row: 0 });
}

#[test]
fn invalid_configuration_is_rejected() {
    for cfg in [
        OctConfig { n_samples: 0, ..OctConfig::default() },
        OctConfig { n_lines: 0, ..OctConfig::default() },
        OctConfig {
            compression: oct_core::CompressionParams { floor_db: -10.0, range_db: 0.0 },
            ..OctConfig::default()
        },
    ] {
        assert!(matches!(simulate(cfg), Err(OctError::Configuration(_))));
    }
}
