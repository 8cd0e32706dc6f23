use std::fs;
use std::io::BufReader;
use std::path::Path;
use std::process::Command;

use atomflow::flatten::count_by_transition;
use atomflow::io::{compound_key_path, read_gml, write_compound_key, write_gml};
use atomflow::{build, flatten, BuildConfig, PoolSet, TransitionType};
use indoc::indoc;
use tempfile::TempDir;

const GLYCOLYSIS: &str = indoc! {"
    Bigg ID: HEX1 MetaNetXId: MNXR100 Reversible: False ECs: 2.7.1.1
    glc + atp = g6p + h2o
    [CH2:1]([OH:2])[CH:3]=[O:4].[P:5]([OH:6])([OH:7])([OH:9])=[O:8]>>[CH2:1]([O:2][P:5]([OH:6])([OH:7])=[O:8])[CH:3]=[O:4].[OH2:9]

    Bigg ID: PGI MetaNetXId: MNXR101 Reversible: True ECs: 5.3.1.9
    g6p = f6p
    [CH2:1]([O:2][P:5]([OH:6])([OH:7])=[O:8])[CH:3]=[O:4]>>[CH2:3]([O:2][P:5]([OH:6])([OH:7])=[O:8])[CH:1]=[O:4]

    Bigg ID: H2Ot MetaNetXId: - Reversible: True
    h2o = h2o
    [OH2:1]>>[OH2:1]

    Bigg ID: HYD MetaNetXId: - Reversible: True
    f6p + h2o = glc + atp
    [CH2:1]([O:2][P:5]([OH:6])([OH:7])=[O:8])[CH:3]=[O:4].[OH2:9]>>[CH2:1]([OH:2])[CH:3]=[O:4].[P:5]([OH:9])([OH:7])([OH:6])=[O:8]
"};

fn write_input(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

// ---------------------------------------------------------------------------
// Library pipeline
// ---------------------------------------------------------------------------

#[test]
fn build_write_and_reload() {
    let dir = TempDir::new().unwrap();
    let built = build(GLYCOLYSIS.as_bytes(), &BuildConfig::default(), &PoolSet::new()).unwrap();

    assert_eq!(built.report.reactions_read, 4);
    assert_eq!(built.report.transport_skipped, 1);
    assert_eq!(built.report.reactions_linked, 3);
    assert_eq!(built.report.naming_inconsistencies, 0);
    assert_eq!(built.registry.len(), 5);

    let flat = flatten(&built.network, true);
    let gml = dir.path().join("atn.gml");
    write_gml(&flat, fs::File::create(&gml).unwrap()).unwrap();
    let key = compound_key_path(&gml);
    write_compound_key(&built.registry, fs::File::create(&key).unwrap()).unwrap();

    let reread = read_gml(BufReader::new(fs::File::open(&gml).unwrap())).unwrap();
    assert_eq!(reread.node_count(), flat.node_count());
    assert_eq!(count_by_transition(&reread), count_by_transition(&flat));
    assert!(reread
        .edge_weights()
        .all(|e| e.transition != TransitionType::ChemicalBond));

    let key_text = fs::read_to_string(&key).unwrap();
    let names: Vec<&str> = key_text
        .lines()
        .map(|l| l.split('\t').nth(1).unwrap())
        .collect();
    assert_eq!(names, vec!["glc", "atp", "g6p", "h2o", "f6p"]);
    assert!(key_text.starts_with("0\tglc\t"));
}

#[test]
fn hydrogen_mapping_adds_hydrogen_edges() {
    let config = BuildConfig {
        map_hydrogens: true,
        ..BuildConfig::default()
    };
    let built = build(GLYCOLYSIS.as_bytes(), &config, &PoolSet::new()).unwrap();
    let net = &built.network;
    assert!(net.count_edges(TransitionType::HydrogenReaction) > 0);
    assert!(net.count_edges(TransitionType::HydrogenFreedReaction) > 0);

    let flat = flatten(net, true);
    for edge in flat.edge_weights() {
        if edge.transition == TransitionType::HydrogenFreedReaction {
            assert!(edge.moving_atom.is_some());
            assert!(edge.reaction_ids.is_some());
        }
    }
}

#[test]
fn pools_split_compounds_by_side() {
    let pools: PoolSet = ["h2o"].into_iter().collect();
    let built = build(GLYCOLYSIS.as_bytes(), &BuildConfig::default(), &pools).unwrap();
    assert!(built.registry.lookup("h2o_in").is_some());
    assert!(built.registry.lookup("h2o_out").is_some());
    assert!(built.registry.lookup("h2o").is_none());
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

fn atomflow() -> Command {
    Command::new(env!("CARGO_BIN_EXE_atomflow"))
}

#[test]
fn cli_build_then_summary() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "reactions.txt", GLYCOLYSIS);
    let pools = write_input(dir.path(), "pools.txt", "h2o\n");
    let config = write_input(dir.path(), "atn.toml", "symmetry = \"full\"\n");
    let output = dir.path().join("atn.gml");

    let status = atomflow()
        .args(["build", "-q", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("-p")
        .arg(&pools)
        .arg("-c")
        .arg(&config)
        .arg("--keep-bonds")
        .status()
        .unwrap();
    assert!(status.success());
    assert!(output.exists());
    assert!(compound_key_path(&output).exists());

    let summary = atomflow().arg("summary").arg(&output).output().unwrap();
    assert!(summary.status.success());
    let text = String::from_utf8(summary.stdout).unwrap();
    assert!(text.contains("ChemicalBond\t"));
    assert!(text.contains("Reaction\t"));
}

#[test]
fn cli_reports_bad_config() {
    let dir = TempDir::new().unwrap();
    let input = write_input(dir.path(), "reactions.txt", GLYCOLYSIS);
    let config = write_input(dir.path(), "atn.toml", "no_such_option = true\n");

    let out = atomflow()
        .args(["build", "-q", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(dir.path().join("atn.gml"))
        .arg("-c")
        .arg(&config)
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to parse config"));
    assert!(!dir.path().join("atn.gml").exists());
}
