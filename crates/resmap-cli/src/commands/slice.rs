use super::read_entry;
use crate::cli::SliceArgs;
use crate::config::PartialCorrespondenceConfig;
use crate::error::Result;
use resmap::workflows::correspond;
use tracing::info;

pub fn run(args: SliceArgs) -> Result<()> {
    let config = PartialCorrespondenceConfig::load(&args.engine)?.merge_with_cli(&args.engine)?;
    let entry = read_entry(&args.input)?;

    info!(
        "Extracting positions [{}, {}) of chain '{}'.",
        args.start, args.end, args.chain
    );
    for line in slice_lines(&entry, &args, &config)? {
        println!("{line}");
    }
    Ok(())
}

fn slice_lines(
    entry: &resmap::core::models::entry::Entry,
    args: &SliceArgs,
    config: &resmap::engine::config::CorrespondenceConfig,
) -> Result<Vec<String>> {
    let coords = correspond::ca_slice(entry, args.chain, args.model, args.start, args.end, config)?;
    Ok(coords
        .iter()
        .enumerate()
        .map(|(offset, p)| format!("{}\t{:.3} {:.3} {:.3}", args.start + offset, p.x, p.y, p.z))
        .collect())
}
