mod common;

use anyhow::Result;
use itertools::Itertools;
use oligo_io::read::FastaReader;
use pretty_assertions::assert_eq;

/// `{output}_R_{r}` records, in file order.
fn read_design(output: &std::path::Path, redundancy: u32) -> Result<Vec<oligo_io::read::Sequence>> {
    let tagged = oligo_io::parse::tag_output_path(output, redundancy);
    Ok(FastaReader::new(tagged)?.read_sequences()?)
}

#[test]
fn widest_ymer_wins_and_covers_in_one_pick() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let query = common::write_input(dir.path(), "query.fasta", ">s1\nAAAAAA\n>s2\nAAAAAB\n");
    let output = dir.path().join("design.fasta");

    set_cover::run(&common::set_cover_args(query, output.clone(), 3, 5))?;

    // AAAAB accounts for both distinct xmers (AAA and AAB) while AAAAA only
    // reaches AAA, so the first pick already completes the cover.
    let design = read_design(&output, 1)?;
    assert_eq!(design.len(), 1);
    assert_eq!(design[0].residues, "AAAAB");
    Ok(())
}

#[test]
fn duplicate_inputs_do_not_inflate_the_design() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let query = common::write_input(dir.path(), "query.fasta", ">a\nACDEFGHIK\n>b\nACDEFGHIK\n");
    let output = dir.path().join("design.fasta");

    set_cover::run(&common::set_cover_args(query, output.clone(), 4, 7))?;

    // Both records contribute the same ymer keys: the design is the same a
    // single copy would need (two picks suffice, a pessimal tie-break costs
    // a third).
    let design = read_design(&output, 1)?;
    assert!((2..=3).contains(&design.len()), "design held {} ymers", design.len());

    // Together the picks span every 4-mer of the input.
    let covered: Vec<&str> = design.iter()
        .flat_map(|ymer| kmers::windows::windows(&ymer.residues, 4))
        .sorted()
        .dedup()
        .collect();
    assert_eq!(covered, ["ACDE", "CDEF", "DEFG", "EFGH", "FGHI", "GHIK"]);
    Ok(())
}

#[test]
fn sequences_shorter_than_the_ymer_window_yield_an_empty_design() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let query = common::write_input(dir.path(), "query.fasta", ">tiny\nACD\n>small\nWYW\n");
    let output = dir.path().join("design.fasta");

    set_cover::run(&common::set_cover_args(query, output.clone(), 2, 5))?;

    assert!(read_design(&output, 1)?.is_empty());
    Ok(())
}

#[test]
fn fully_pre_designed_inputs_yield_an_empty_design() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let query = common::write_input(dir.path(), "query.fasta", ">s\nAAAAAA\n");
    let pre = common::write_input(dir.path(), "pre.fasta", ">done\nAAAAAA\n");
    let output = dir.path().join("design.fasta");

    let mut args = common::set_cover_args(query, output.clone(), 3, 5);
    args.pre_designed = Some(pre);
    set_cover::run(&args)?;

    assert!(read_design(&output, 1)?.is_empty());
    Ok(())
}

#[test]
fn identical_seeds_reproduce_the_design() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let fasta = ">s1\nACDEFGHIKLMNPQRSTVWY\n>s2\nGHIKLMNPQRACDEFSTVWY\n";
    let query = common::write_input(dir.path(), "query.fasta", fasta);

    let first_out = dir.path().join("first.fasta");
    let second_out = dir.path().join("second.fasta");
    set_cover::run(&common::set_cover_args(query.clone(), first_out.clone(), 3, 7))?;
    set_cover::run(&common::set_cover_args(query, second_out.clone(), 3, 7))?;

    let first = std::fs::read_to_string(oligo_io::parse::tag_output_path(&first_out, 1))?;
    let second = std::fs::read_to_string(oligo_io::parse::tag_output_path(&second_out, 1))?;
    assert_eq!(first, second);
    Ok(())
}

#[test]
fn on_disk_designs_are_only_replaced_by_smaller_ones() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let query = common::write_input(dir.path(), "query.fasta", ">s1\nAAAAAA\n>s2\nAAAAAB\n");
    let output = dir.path().join("design.fasta");

    // A previous (better, single-record) run is already on disk.
    let tagged = oligo_io::parse::tag_output_path(&output, 1);
    std::fs::write(&tagged, ">precomputed\nAAAAB\n")?;

    set_cover::run(&common::set_cover_args(query, output.clone(), 3, 5))?;

    // The fresh design also holds one record, which does not improve on the
    // one already on disk: the file is untouched.
    let contents = std::fs::read_to_string(&tagged)?;
    assert_eq!(contents, ">precomputed\nAAAAB\n");
    Ok(())
}

#[test]
fn ymer_window_of_256_is_refused() {
    let dir = tempfile::tempdir().expect("Temp dir should be creatable");
    let query = common::write_input(dir.path(), "query.fasta", ">s\nAAAA\n");
    let output = dir.path().join("design.fasta");

    let args = common::set_cover_args(query, output, 100, 256);
    assert!(set_cover::run(&args).is_err());
}

#[test]
fn missing_query_is_refused() {
    let dir = tempfile::tempdir().expect("Temp dir should be creatable");
    let args = common::set_cover_args(
        dir.path().join("absent.fasta"),
        dir.path().join("design.fasta"),
        3,
        5,
    );
    assert!(set_cover::run(&args).is_err());
}
