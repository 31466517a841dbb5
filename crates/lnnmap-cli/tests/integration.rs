//! End-to-end scenarios for the mapping pipeline, driven through the CLI
//! library entry points (§8).

use std::fs;

use lnnmap_cli::pipeline::{run_batch, run_file, CouplingSource, RunConfig};
use lnnmap_core::MapperConfig;
use lnnmap_map::CouplingGraph;

fn config_with(coupling: CouplingSource) -> RunConfig {
    RunConfig {
        mapper: MapperConfig::default(),
        coupling,
    }
}

fn write_source(dir: &tempfile::TempDir, name: &str, source: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, source).unwrap();
    path
}

#[test]
fn single_cnot_adjacent() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(&dir, "in.qasm", "qreg q[2];\ncx q[0],q[1];\n");
    let output = dir.path().join("out.qasm");

    let coupling = CouplingGraph::from_edges(2, &[(0, 1)]).unwrap();
    let config = config_with(CouplingSource::Fixed(coupling));

    let report = run_file(&input, &output, &config).unwrap();

    assert_eq!(report.total_cost, 10);
    assert_eq!(report.swap_count, 0);
    assert_eq!(report.free_swap_count, 0);
    assert_eq!(report.initial_mapping, vec![0, 1]);

    let rendered = fs::read_to_string(&output).unwrap();
    assert!(rendered.contains("cx q[0],q[1];"));
    assert!(rendered.contains("// i 0 1"));
}

#[test]
fn single_cnot_distance_two_resolves_with_a_free_swap() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(&dir, "in.qasm", "qreg q[3];\ncx q[0],q[2];\n");
    let output = dir.path().join("out.qasm");

    let coupling = CouplingGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
    let config = config_with(CouplingSource::Fixed(coupling));

    let report = run_file(&input, &output, &config).unwrap();

    assert_eq!(report.total_cost, 10);
    assert_eq!(report.swap_count, 0);
    assert_eq!(report.free_swap_count, 1);
    assert!(report.initial_mapping == vec![1, 0, 2] || report.initial_mapping == vec![0, 2, 1]);

    let rendered = fs::read_to_string(&output).unwrap();
    assert!(rendered.contains("cx q["));
}

#[test]
fn single_cnot_distance_three_resolves_with_a_bridge() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(&dir, "in.qasm", "qreg q[4];\ncx q[0],q[3];\n");
    let output = dir.path().join("out.qasm");

    let coupling = CouplingGraph::from_edges(4, &[(0, 1), (1, 2), (2, 3)]).unwrap();
    let config = config_with(CouplingSource::Fixed(coupling));

    let report = run_file(&input, &output, &config).unwrap();

    assert_eq!(report.total_cost, 40);
    assert_eq!(report.swap_count, 0);
    assert_eq!(report.free_swap_count, 0);

    let rendered = fs::read_to_string(&output).unwrap();
    let cnot_count = rendered.matches("cx q[").count();
    assert_eq!(cnot_count, 4);
}

#[test]
fn two_consecutive_cnots_sharing_a_qubit() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(
        &dir,
        "in.qasm",
        "qreg q[3];\ncx q[0],q[2];\ncx q[0],q[2];\n",
    );
    let output = dir.path().join("out.qasm");

    let coupling = CouplingGraph::from_edges(3, &[(0, 1), (1, 2)]).unwrap();
    let config = config_with(CouplingSource::Fixed(coupling));

    let report = run_file(&input, &output, &config).unwrap();

    assert_eq!(report.total_cost, 20);
    assert_eq!(report.free_swap_count, 1);

    let rendered = fs::read_to_string(&output).unwrap();
    assert_eq!(rendered.matches("cx q[").count(), 2);
}

#[test]
fn checkpoint_bands_are_resolved_in_order() {
    let dir = tempfile::tempdir().unwrap();
    // Six CNOTs spread across three checkpoint bands (offset 2): a naive
    // heuristic could be tempted to resolve a later-band gate first since
    // its operands are already adjacent.
    let source = "qreg q[4];\n\
                  cx q[0],q[1];\n\
                  cx q[2],q[3];\n\
                  cx q[0],q[1];\n\
                  cx q[2],q[3];\n\
                  cx q[0],q[1];\n\
                  cx q[2],q[3];\n";
    let input = write_source(&dir, "in.qasm", source);
    let output = dir.path().join("out.qasm");

    let coupling = CouplingGraph::linear(4);
    let config = RunConfig {
        mapper: MapperConfig::new(2, 2),
        coupling: CouplingSource::Fixed(coupling),
    };

    let report = run_file(&input, &output, &config).unwrap();
    assert_eq!(report.swap_count, 0);
    assert_eq!(report.free_swap_count, 0);

    let rendered = fs::read_to_string(&output).unwrap();
    let gate_lines: Vec<&str> = rendered
        .lines()
        .filter(|line| line.starts_with("cx"))
        .collect();
    assert_eq!(gate_lines.len(), 6);
}

#[test]
fn unmappable_degenerate_coupling_surfaces_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(&dir, "in.qasm", "qreg q[2];\ncx q[0],q[1];\n");
    let output = dir.path().join("out.qasm");

    let coupling = CouplingGraph::from_edges(2, &[]).unwrap();
    let config = config_with(CouplingSource::Fixed(coupling));

    assert!(run_file(&input, &output, &config).is_err());
    assert!(!output.exists());
}

#[test]
fn unknown_mnemonic_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_source(&dir, "in.qasm", "qreg q[2];\nccx q[0],q[1];\n");
    let output = dir.path().join("out.qasm");

    let config = config_with(CouplingSource::Named("linear".to_string()));

    assert!(run_file(&input, &output, &config).is_err());
}

#[test]
fn batch_driver_maps_every_file_and_writes_one_report_row_each() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();

    write_source(&input_dir, "a.qasm", "qreg q[2];\ncx q[0],q[1];\n");
    write_source(&input_dir, "b.qasm", "qreg q[3];\ncx q[0],q[2];\n");
    write_source(&input_dir, "notes.txt", "not a circuit");

    let config = config_with(CouplingSource::Named("linear".to_string()));
    let reports = run_batch(input_dir.path(), output_dir.path(), &config).unwrap();

    assert_eq!(reports.len(), 2);
    assert!(output_dir.path().join("a.qasm").exists());
    assert!(output_dir.path().join("b.qasm").exists());

    let csv = lnnmap_cli::pipeline::render_results_csv(&reports);
    assert_eq!(csv.lines().count(), 3); // header + 2 rows
    assert!(csv.contains("a.qasm"));
    assert!(csv.contains("b.qasm"));
}
