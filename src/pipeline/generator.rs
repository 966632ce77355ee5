//! Per-size pipeline driver

use super::coverage::{CoverageStats, check_character_coverage};
use super::encoding::fix_bdf_encodings;
use super::file_name;
use super::intermediate::Intermediate;
use super::manifest::{DebugInfo, generate_metadata, write_manifest};
use super::pack::convert_to_pcf;
use super::rasterize::convert_to_bdf;
use super::subset::generate_subset_font;
use crate::config::{CharacterSet, GenerationConfig, OutputFormat};
use crate::error::Result;
use crate::logging::{GenerationLog, RunLog};
use crate::tools::Toolchain;
use std::path::{Path, PathBuf};

/// File names produced for one point size
struct SizePaths {
    subset: PathBuf,
    bdf: PathBuf,
    pcf: PathBuf,
}

impl SizePaths {
    fn new(font_output_dir: &Path, font_family: &str, size: u32) -> Self {
        let stem = format!("{font_family}-{size}pt");
        Self {
            subset: font_output_dir.join(format!("{stem}-subset.ttf")),
            bdf: font_output_dir.join(format!("{stem}.bdf")),
            pcf: font_output_dir.join(format!("{stem}.pcf")),
        }
    }
}

/// Generate every requested size and format into `<output_dir>/<font_family>/`
///
/// A failing stage skips its size and the run carries on with the next
/// one. Returns the basenames of all produced artifacts; an empty list
/// means nothing could be generated. Only creating the output directory
/// and writing the manifest can fail the whole run.
pub async fn generate_font(
    config: &GenerationConfig,
    chars: &CharacterSet,
    output_dir: &Path,
    toolchain: &Toolchain,
    log: &mut GenerationLog,
) -> Result<Vec<String>> {
    let font_family = config.output.font_family.as_str();
    let font_output_dir = output_dir.join(font_family);
    std::fs::create_dir_all(&font_output_dir)?;

    let coverage = if log.is_debug() {
        log.section("Checking character coverage");
        let (_, _, stats) = check_character_coverage(&config.source_font, chars, log);
        Some(stats)
    } else {
        None
    };

    log.section(&format!("Generating fonts for {} size(s)", config.sizes.len()));

    let mut generated_files = Vec::new();
    for &size in &config.sizes {
        log.info(&format!("Processing size {size}pt:"));
        let paths = SizePaths::new(&font_output_dir, font_family, size);
        generated_files.extend(generate_size(config, chars, size, paths, toolchain, log).await);
    }

    if !generated_files.is_empty() && config.output.metadata {
        write_run_manifest(config, chars, &generated_files, &font_output_dir, coverage, log)?;
    }

    Ok(generated_files)
}

async fn generate_size(
    config: &GenerationConfig,
    chars: &CharacterSet,
    size: u32,
    paths: SizePaths,
    toolchain: &Toolchain,
    log: &mut GenerationLog,
) -> Vec<String> {
    let mut produced = Vec::new();

    // The subset font is never an artifact; the guard removes it on every path out
    let subset = Intermediate::new(paths.subset);
    if generate_subset_font(&toolchain.subsetter, &config.source_font, chars, subset.path(), log)
        .await
        .is_err()
    {
        log.warn(&format!("Skipping size {size}pt due to subsetting failure"));
        return produced;
    }

    let bdf = Intermediate::new(paths.bdf);
    if convert_to_bdf(&toolchain.rasterizer, subset.path(), bdf.path(), size, log)
        .await
        .is_err()
    {
        log.warn(&format!("Skipping size {size}pt due to BDF conversion failure"));
        return produced;
    }

    if fix_bdf_encodings(bdf.path(), chars, log).is_err() {
        log.warn(&format!("Skipping size {size}pt due to BDF encoding fix failure"));
        return produced;
    }

    let keep_bdf = config.wants(OutputFormat::Bdf);
    if keep_bdf {
        produced.push(file_name(bdf.path()));
    }

    if config.wants(OutputFormat::Pcf) {
        let pcf = Intermediate::new(paths.pcf);
        match convert_to_pcf(&toolchain.packer, bdf.path(), pcf.path(), log).await {
            Ok(()) => produced.push(file_name(&pcf.keep())),
            Err(_) => log.warn(&format!("PCF conversion failed for size {size}pt")),
        }
    }

    if keep_bdf {
        bdf.keep();
    }
    produced
}

fn write_run_manifest(
    config: &GenerationConfig,
    chars: &CharacterSet,
    generated_files: &[String],
    font_output_dir: &Path,
    coverage: Option<CoverageStats>,
    log: &mut GenerationLog,
) -> Result<()> {
    let debug_info = log.is_debug().then(|| DebugInfo::from_log(log, coverage));
    let manifest = generate_metadata(config, chars, generated_files, font_output_dir, debug_info);
    let path = write_manifest(&manifest, font_output_dir, &config.output.font_family)?;

    if log.verbosity().is_verbose() {
        log.success(&format!("Wrote manifest to {}", file_name(&path)));
    }
    Ok(())
}
