use criterion::{black_box, criterion_group, criterion_main, Criterion};
use physalia_chem::{find_substructure_matches, parse_smiles};

/// A set of representative drug-like SMILES strings
const SMILES_SET: &[&str] = &[
    "CCO",                                  // ethanol
    "CC(=O)O",                              // acetic acid
    "c1ccccc1",                             // benzene
    "CC(=O)Oc1ccccc1C(=O)O",                // aspirin
    "CN1C=NC2=C1C(=O)N(C(=O)N2C)C",         // caffeine
    "CC(C)CC1=CC=C(C=C1)C(C)C(=O)O",        // ibuprofen
    "OC(=O)C1=CC=CC=C1O",                   // salicylic acid
    "CC(=O)NC1=CC=C(C=C1)O",                // acetaminophen
    "N[C@@H](C)C(=O)O",                     // L-alanine
    "F/C=C/F",                              // trans-difluoroethene
    "c1ccc2ccccc2c1",                       // naphthalene
    "C1CCCCC1",                             // cyclohexane
    "C(=O)(N)N",                            // urea
    "CCCCCCCC",                             // octane
    "c1ccncc1",                             // pyridine
    "c1cc[nH]c1",                           // pyrrole
    "C1=CSC=C1",                            // thiophene
    "[13CH4]",                              // labelled methane
    "C%10CCCCCCCCC%10",                     // two-digit ring closure
    "O[C@]1(C)CC1",                         // ring-closure stereocentre
];

fn bench_smiles_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("smiles_parse");

    // Parse 1k molecules (cycle through the 20 SMILES)
    let smiles_1k: Vec<&str> = SMILES_SET.iter().copied().cycle().take(1000).collect();

    group.bench_function("1k_mols", |b| {
        b.iter(|| {
            for &smi in black_box(&smiles_1k) {
                let _ = parse_smiles(smi);
            }
        })
    });

    group.finish();
}

fn bench_substructure(c: &mut Criterion) {
    let mut group = c.benchmark_group("substructure");

    let targets: Vec<_> = SMILES_SET
        .iter()
        .filter_map(|s| parse_smiles(s).ok())
        .collect();
    let benzene = parse_smiles("c1ccccc1").unwrap();
    let carbonyl = parse_smiles("C=O").unwrap();

    group.bench_function("benzene_in_set", |b| {
        b.iter(|| {
            for target in black_box(&targets) {
                let _ = find_substructure_matches(target, &benzene);
            }
        })
    });

    group.bench_function("carbonyl_in_set", |b| {
        b.iter(|| {
            for target in black_box(&targets) {
                let _ = find_substructure_matches(target, &carbonyl);
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_smiles_parse, bench_substructure);
criterion_main!(benches);
