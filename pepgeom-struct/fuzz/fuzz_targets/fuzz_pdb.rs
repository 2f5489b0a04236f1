#![no_main]
use libfuzzer_sys::fuzz_target;
use pepgeom_struct::{parse_pdb, parse_pdb_with, ParseOptions};

fuzz_target!(|data: &str| {
    let _ = parse_pdb(data);
    let _ = parse_pdb_with(data, &ParseOptions::amino_acids_only());
});
