use bo_fluids::{CompVec, PhaseVec};
use bo_project::schema::*;
use bo_project::{
    ProjectError, cartesian_reservoir, file_output, load_config, load_pvt_model, load_yaml,
    pvt_tables_path, save_yaml, sim_options,
};
use bo_sim::{Grid, OperatingMode, OutputSink, Rock, SimulationState};
use std::path::{Path, PathBuf};

fn demos() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos")
}

#[test]
fn demo_configs_load_and_convert() {
    for name in ["box.yaml", "gravity_column.json"] {
        let path = demos().join(name);
        let config =
            load_config(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        let opts = sim_options(&config).unwrap();
        assert_eq!(opts.mode, OperatingMode::FullyImplicit);
        let (grid, rock) = cartesian_reservoir(&config.fileformat).unwrap();
        assert!(grid.num_cells() > 0);
        assert!(rock.porosity(0) > 0.0);

        let tables = pvt_tables_path(&path, &config).unwrap();
        let model = load_pvt_model(&tables).unwrap();
        assert_eq!(model.name(), "live gas");
    }
}

#[test]
fn configured_output_dir_receives_step_files() {
    let tmp = tempfile::tempdir().unwrap();
    let mut config = load_config(&demos().join("box.yaml")).unwrap();
    let out_dir = tmp.path().join("box-run");
    config.simulation.output_dir = out_dir.to_string_lossy().into_owned();

    let (grid, _) = cartesian_reservoir(&config.fileformat).unwrap();
    let state = SimulationState {
        cell_pressure: vec![PhaseVec::uniform(1.0e7); grid.num_cells()],
        face_pressure: vec![PhaseVec::uniform(1.0e7); grid.num_faces()],
        cell_z: vec![CompVec::new(0.0, 0.0, 1.0); grid.num_cells()],
        face_flux: vec![0.0; grid.num_faces()],
        ..SimulationState::default()
    };
    let mut output = file_output(&config);
    output.write_step(0, &grid, &state).unwrap();
    assert!(out_dir.join("blackoil-output-0.dat").is_file());
    assert!(out_dir.join("blackoil-output-0.vtk").is_file());
}

#[test]
fn gravity_demo_sets_gravity_and_defaults() {
    let config = load_config(&demos().join("gravity_column.json")).unwrap();
    let opts = sim_options(&config).unwrap();
    assert!(opts.gravity_test);
    assert_eq!(opts.gravity(), [0.0, 0.0, 10.0]);
    // Unset cell sizes fall back to one metre
    let (grid, _) = cartesian_reservoir(&config.fileformat).unwrap();
    assert_eq!(grid.cell_size(), [1.0, 1.0, 2.0]);
    assert_eq!(grid.num_cells(), 20);
}

#[test]
fn demo_tables_evaluate_on_saturated_curve() {
    let model = load_pvt_model(&demos().join("live_gas.yaml")).unwrap();
    // Rv = 0.0002 at 100 bar is the second saturated point
    let props = model
        .evaluate(0, 1.0e7, &CompVec::new(0.0, 2.0e-4, 1.0))
        .unwrap();
    assert!((props.b - 0.0118).abs() < 1e-12);
    assert!((props.r - 2.0e-4).abs() < 1e-15);
}

#[test]
fn yaml_roundtrip() {
    let config = RunConfig {
        version: 1,
        name: "roundtrip".to_string(),
        fileformat: FileFormatDef::Cartesian {
            nx: 4,
            ny: 3,
            nz: 2,
            dx: 5.0,
            dy: 5.0,
            dz: 1.0,
            default_poro: 0.3,
            default_perm_md: 250.0,
        },
        simulation: SimulationDef {
            do_impes: true,
            transport_scheme: TransportSchemeDef::Legacy,
            ..SimulationDef::default()
        },
        boundaries: vec![BoundaryDef {
            id: 3,
            kind: BoundaryKind::Neumann { flux_m3_per_s: 0.0 },
        }],
        pvt_tables: Some("tables.yaml".to_string()),
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.yaml");
    save_yaml(&path, &config).unwrap();
    let loaded = load_yaml(&path).unwrap();
    assert_eq!(config, loaded);
}

#[test]
fn unknown_fileformat_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "fileformat:\n  type: gmsh\n  filename: a.msh\n").unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ProjectError::Yaml(_)));
}

#[test]
fn malformed_table_is_a_pvt_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad_pvt.json");
    let text = r#"{
        "type": "live_oil",
        "regions": [{ "rows": [
            { "pressure_bar": 100.0, "ratio": 50.0, "b": 1.2, "viscosity_cp": 1.0 },
            { "pressure_bar": 90.0, "ratio": 60.0, "b": 1.3, "viscosity_cp": 0.9 }
        ]}]
    }"#;
    std::fs::write(&path, text).unwrap();
    let err = load_pvt_model(&path).unwrap_err();
    assert!(matches!(err, ProjectError::Pvt(_)));
}

#[test]
fn empty_region_list_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.yaml");
    std::fs::write(&path, "type: dead\nphase: aqua\nregions: []\n").unwrap();
    let err = load_pvt_model(&path).unwrap_err();
    assert!(matches!(err, ProjectError::Validation(_)));
}
