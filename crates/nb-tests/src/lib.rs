//! Integration tests for the narrowband normalizer crates.
//!
//! End-to-end checks of the pipeline properties that span several crates:
//! no-op defaults, per-stage identities, colour round trips, lightness
//! replacement and the TIFF glue.

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nb_color::{from_lab, to_lab, LightnessMode};
    use nb_core::{Image, Mode, Palette, Plane};
    use nb_ops::{
        boost, clip_blackpoint, scnr, tone, BlackpointReference, Parameters, Pipeline,
        ScnrMethod,
    };
    use tempfile::tempdir;

    fn flat_2x2() -> Image {
        Image::from_planes(
            Plane::filled(2, 2, 0.2),
            Plane::filled(2, 2, 0.3),
            Plane::filled(2, 2, 0.1),
        )
        .unwrap()
    }

    /// Deterministic pseudo-random image in `[lo, hi)`.
    fn noise(width: u32, height: u32, lo: f64, hi: f64) -> Image {
        let n = (width * height) as usize;
        let mut state = 0x2545_f491_u64;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            lo + (hi - lo) * ((state >> 11) as f64 / (1u64 << 53) as f64)
        };
        let mut plane = || Plane::from_data(width, height, (0..n).map(|_| next()).collect()).unwrap();
        let (r, g, b) = (plane(), plane(), plane());
        Image::from_planes(r, g, b).unwrap()
    }

    fn assert_images_close(a: &Image, b: &Image, max_relative: f64) {
        assert_eq!(a.dimensions(), b.dimensions());
        for (p, q) in a.planes().iter().zip(b.planes()) {
            for (&x, &y) in p.data().iter().zip(q.data()) {
                assert_relative_eq!(x, y, epsilon = 1e-12, max_relative = max_relative);
            }
        }
    }

    fn run(params: Parameters, image: Image) -> Image {
        Pipeline::new(params).unwrap().run(image).unwrap()
    }

    // ------------------------------------------------------------------
    // Scenarios
    // ------------------------------------------------------------------

    #[test]
    fn test_defaults_return_input() {
        let image = flat_2x2();
        let out = run(Parameters::default(), image.clone());
        assert_eq!(out, image);
    }

    #[test]
    fn test_defaults_return_input_for_noise() {
        let image = noise(16, 9, 0.0, 1.0);
        assert_eq!(run(Parameters::default(), image.clone()), image);
    }

    #[test]
    fn test_sii_boost_doubles_only_sii() {
        let image = flat_2x2();
        let params = Parameters::builder().sii_boost(2.0).build().unwrap();
        let out = run(params, image.clone());

        assert!(out.plane(1).data().iter().all(|&v| v == 0.6));
        assert_eq!(out.plane(0), image.plane(0));
        assert_eq!(out.plane(2), image.plane(2));
        assert!(out.plane(0).shares_data(image.plane(0)));
    }

    #[test]
    fn test_sii_boost_follows_palette() {
        let image = flat_2x2();
        let params = Parameters::builder()
            .palette(Palette::Sho)
            .sii_boost(2.0)
            .build()
            .unwrap();
        let out = run(params, image.clone());
        assert!(out.plane(0).data().iter().all(|&v| v == 0.4));
        assert_eq!(out.plane(1), image.plane(1));
        assert_eq!(out.plane(2), image.plane(2));
    }

    #[test]
    fn test_ha_lightness_raises_l_keeps_ab() {
        let image = Image::from_planes(
            Plane::filled(2, 2, 0.5),
            Plane::filled(2, 2, 0.35),
            Plane::filled(2, 2, 0.3),
        )
        .unwrap();

        let off = run(Parameters::default(), image.clone());
        let params = Parameters::builder()
            .lightness(LightnessMode::Ha)
            .build()
            .unwrap();
        let ha = run(params, image);

        let lab_off = to_lab(&off, Mode::NonLinear).unwrap();
        let lab_ha = to_lab(&ha, Mode::NonLinear).unwrap();
        for i in 0..4 {
            assert!(lab_ha.l().data()[i] > lab_off.l().data()[i]);
            assert_relative_eq!(lab_ha.a().data()[i], lab_off.a().data()[i], epsilon = 1e-6);
            assert_relative_eq!(lab_ha.b().data()[i], lab_off.b().data()[i], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_original_lightness_roundtrip_through_pipeline() {
        let image = noise(8, 8, 0.05, 0.95);
        for mode in [Mode::Linear, Mode::NonLinear] {
            let params = Parameters::builder()
                .mode(mode)
                .lightness(LightnessMode::Original)
                .build()
                .unwrap();
            let out = run(params, image.clone());
            if mode == Mode::NonLinear {
                assert_images_close(&out, &image, 1e-6);
            } else {
                // linear data also receives the display gamma
                let encoded = tone::shape_tones(&image, &Default::default(), Mode::Linear).unwrap();
                assert_images_close(&out, &tone::clip_to_display(&encoded), 1e-6);
            }
        }
    }

    // ------------------------------------------------------------------
    // Stage properties
    // ------------------------------------------------------------------

    #[test]
    fn test_color_roundtrip() {
        let image = noise(32, 32, 0.0, 1.0);
        for mode in [Mode::Linear, Mode::NonLinear] {
            let back = from_lab(&to_lab(&image, mode).unwrap(), mode).unwrap();
            assert_images_close(&back, &image, 1e-6);
        }
    }

    #[test]
    fn test_blackpoint_one_is_noop() {
        let image = noise(10, 10, 0.0, 1.0);
        assert_eq!(clip_blackpoint(&image, 1.0).unwrap(), image);
    }

    #[test]
    fn test_scnr_idempotent() {
        let image = noise(10, 10, 0.0, 1.0);
        for method in [ScnrMethod::AverageNeutral, ScnrMethod::MaximumNeutral] {
            let once = scnr(&image, method, true).unwrap();
            assert_eq!(scnr(&once, method, true).unwrap(), once);
            assert!(once
                .plane(1)
                .data()
                .iter()
                .zip(image.plane(1).data())
                .all(|(&after, &before)| after <= before));
        }
    }

    #[test]
    fn test_booster_unit_is_noop() {
        let image = noise(10, 10, 0.0, 1.0);
        for palette in Palette::ALL {
            assert_eq!(boost(&image, palette, 1.0, 1.0).unwrap(), image);
        }
    }

    #[test]
    fn test_brightness_composes() {
        let image = noise(6, 6, 0.0, 0.5);
        let curve = |gain| tone::ToneCurve {
            brightness: gain,
            ..Default::default()
        };
        let twice = tone::shape_tones(
            &tone::shape_tones(&image, &curve(1.5), Mode::NonLinear).unwrap(),
            &curve(0.8),
            Mode::NonLinear,
        )
        .unwrap();
        let once = tone::shape_tones(&image, &curve(1.2), Mode::NonLinear).unwrap();
        assert_images_close(&twice, &once, 1e-12);
    }

    #[test]
    fn test_output_in_display_range() {
        let image = noise(12, 12, 0.0, 1.0);
        let params = Parameters::builder()
            .sii_boost(3.0)
            .oiii_boost(0.5)
            .blackpoint(0.1)
            .scnr(true)
            .lightness(LightnessMode::Oiii)
            .hl_recover(2.0)
            .hl_reduction(1.5)
            .brightness(1.8)
            .build()
            .unwrap();
        let out = run(params, image);
        assert!(out.floor().unwrap() >= 0.0);
        assert!(out.peak().unwrap() <= nb_core::DISPLAY_WHITE);
    }

    #[test]
    fn test_highlight_recovery_dims_highlights() {
        let image = noise(12, 12, 0.0, 1.0);
        let params = Parameters::builder().hl_recover(3.0).build().unwrap();
        let out = run(params, image.clone());
        for (p, q) in out.planes().iter().zip(image.planes()) {
            for (&after, &before) in p.data().iter().zip(q.data()) {
                if before <= tone::KNEE {
                    assert_eq!(after, before);
                } else {
                    assert!(after < before);
                }
            }
        }
    }

    #[test]
    fn test_median_blackpoint_through_pipeline() {
        let image = noise(10, 10, 0.2, 0.9);
        let params = Parameters::builder()
            .blackpoint(0.0)
            .blackpoint_ref(BlackpointReference::Median)
            .build()
            .unwrap();
        let out = run(params, image.clone());
        // a zero fraction of the min-to-median span removes exactly the floor
        assert_eq!(out.floor(), Some(0.0));
        assert_relative_eq!(out.peak().unwrap(), image.peak().unwrap(), max_relative = 1e-12);
    }

    // ------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------

    #[test]
    fn test_invalid_parameters() {
        let bad = [
            Parameters {
                blackpoint: 1.01,
                ..Default::default()
            },
            Parameters {
                oiii_boost: -1.0,
                ..Default::default()
            },
            Parameters {
                hl_reduction: 0.0,
                ..Default::default()
            },
        ];
        for params in bad {
            assert!(Pipeline::new(params).unwrap_err().is_invalid_parameter());
        }
    }

    #[test]
    fn test_domain_errors() {
        let nan = Image::from_planes(
            Plane::from_data(2, 1, vec![0.1, f64::NAN]).unwrap(),
            Plane::filled(2, 1, 0.1),
            Plane::filled(2, 1, 0.1),
        )
        .unwrap();
        let params = Parameters::builder()
            .lightness(LightnessMode::Original)
            .build()
            .unwrap();
        assert!(Pipeline::new(params).unwrap().run(nan).unwrap_err().is_domain_error());
    }

    #[test]
    fn test_negative_linear_rejected_without_colour_conversion() {
        let negative = Image::from_planes(
            Plane::from_data(2, 1, vec![0.2, -0.1]).unwrap(),
            Plane::filled(2, 1, 0.3),
            Plane::filled(2, 1, 0.1),
        )
        .unwrap();
        let params = Parameters::builder().mode(Mode::Linear).build().unwrap();
        let err = Pipeline::new(params).unwrap().run(negative).unwrap_err();
        assert!(err.is_domain_error());
    }

    #[test]
    fn test_nan_never_clipped_to_black() {
        let nan = Image::from_planes(
            Plane::from_data(2, 1, vec![0.2, f64::NAN]).unwrap(),
            Plane::filled(2, 1, 0.1),
            Plane::filled(2, 1, 0.1),
        )
        .unwrap();
        for params in [
            Parameters::default(),
            Parameters::builder().blackpoint(0.3).build().unwrap(),
        ] {
            let err = Pipeline::new(params).unwrap().run(nan.clone()).unwrap_err();
            assert!(err.is_domain_error());
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let err = Image::from_planes(Plane::zeros(4, 4), Plane::zeros(4, 4), Plane::zeros(4, 3))
            .unwrap_err();
        assert!(err.is_shape_error());
    }

    // ------------------------------------------------------------------
    // File glue
    // ------------------------------------------------------------------

    #[test]
    fn test_tiff_pipeline_roundtrip() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.tif");
        let output = dir.path().join("out.tif");

        let image = noise(16, 8, 0.0, 1.0);
        nb_cli::io::write_tiff(&input, &image).unwrap();

        let loaded = nb_cli::io::read_tiff(&input).unwrap();
        let params = Parameters::builder().sii_boost(0.5).build().unwrap();
        let out = run(params, loaded);
        nb_cli::io::write_tiff(&output, &out).unwrap();

        let back = nb_cli::io::read_tiff(&output).unwrap();
        for (&x, &y) in back.plane(1).data().iter().zip(image.plane(1).data()) {
            assert_relative_eq!(x, y * 0.5, epsilon = 1e-6);
        }
        for (&x, &y) in back.plane(0).data().iter().zip(image.plane(0).data()) {
            assert_relative_eq!(x, y, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_save_channels() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("m42.tif");
        let written = nb_cli::io::write_channels(&output, &flat_2x2()).unwrap();
        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["m42_r.tif", "m42_g.tif", "m42_b.tif"]);
    }

    #[test]
    fn test_preset_drives_pipeline() {
        let params = nb_cli::preset::parse("sii_boost: 2.0\npalette: hso\n").unwrap();
        let out = run(params, flat_2x2());
        assert!(out.plane(1).data().iter().all(|&v| v == 0.6));
    }
}
