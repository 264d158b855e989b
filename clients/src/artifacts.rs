//! Writing generated tables to an output directory.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use actlut::config::TableSpec;
use actlut::serializer::{self, OutputFormat};
use actlut::{artifact_name, generate_table, pair_artifact_name, Table};
use anyhow::{Context, Result};
use tracing::info;

/// Tables generated by [`write_artifacts`] and the files written for them.
#[derive(Debug)]
pub struct Built {
    /// Generated tables, sigmoid first when paired.
    pub tables: Vec<Table>,
    /// Written artifact paths, in write order.
    pub paths: Vec<PathBuf>,
}

/// Generates the tables `spec` describes and writes them under `out`.
///
/// `out` is created if missing. A single table becomes one artifact; a pair
/// becomes one combined case table, or one artifact per table for every
/// other format.
///
/// # Errors
///
/// Returns an error if the description is invalid or if the directory or any
/// artifact cannot be written.
pub fn write_artifacts(spec: &TableSpec, out: &Path) -> Result<Built> {
    fs::create_dir_all(out)
        .with_context(|| format!("Failed to create output directory: {}", out.display()))?;

    if spec.table.paired {
        write_pair(spec, out)
    } else {
        write_single(spec, out)
    }
}

fn write_single(spec: &TableSpec, out: &Path) -> Result<Built> {
    let config = spec.to_config().context("Invalid table configuration")?;
    let table = generate_table(&config);

    let format = spec.output.format;
    let path = out.join(artifact_name(&config, format.extension()));
    let file =
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut sink = BufWriter::new(file);
    serializer::write_to(&mut sink, &table, format, &spec.render_options())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), %format, "wrote table");

    Ok(Built {
        tables: vec![table],
        paths: vec![path],
    })
}

fn write_pair(spec: &TableSpec, out: &Path) -> Result<Built> {
    let pair = spec.to_pair().context("Invalid table configuration")?;

    let format = spec.output.format;
    let docs = serializer::render_pair(&pair, format, &spec.render_options())
        .context("Failed to render table pair")?;
    let names = match format {
        OutputFormat::Case => vec![pair_artifact_name(&pair, format.extension())],
        _ => vec![
            artifact_name(pair.sigmoid().config(), format.extension()),
            artifact_name(pair.prime().config(), format.extension()),
        ],
    };

    let mut paths = Vec::with_capacity(names.len());
    for (name, doc) in names.iter().zip(&docs) {
        let path = out.join(name);
        fs::write(&path, doc).with_context(|| format!("Failed to write {}", path.display()))?;
        info!(path = %path.display(), %format, "wrote table");
        paths.push(path);
    }

    Ok(Built {
        tables: vec![pair.sigmoid().clone(), pair.prime().clone()],
        paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> TableSpec {
        TableSpec::from_toml_str(text).unwrap()
    }

    #[test]
    fn single_table_writes_one_named_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("tables");
        let spec = parse("[table]\nsize = 1024\nvalue_bits = 8\ndomain_bound = 8\n");

        let built = write_artifacts(&spec, &out).unwrap();
        assert_eq!(built.tables.len(), 1);
        assert_eq!(
            built.paths,
            vec![out.join("sigmoid_table_size1024_word8_maxdom8.v")]
        );

        let text = fs::read_to_string(&built.paths[0]).unwrap();
        assert_eq!(text.lines().count(), 1024);
        assert!(text.contains("\t\t10'b0000000000: sigmoid = 8'b10000000;"));
    }

    #[test]
    fn paired_case_writes_one_combined_table() {
        let dir = tempfile::tempdir().unwrap();
        let spec = parse("[table]\npaired = true\nsize = 256\nvalue_bits = 6\ndomain_bound = 2");

        let built = write_artifacts(&spec, dir.path()).unwrap();
        assert_eq!(built.tables.len(), 2);
        assert_eq!(built.paths.len(), 1);
        assert_eq!(
            built.paths[0].file_name().unwrap(),
            "sigmoid_sigmoidprime_table_size256_word6_maxdom2.v"
        );

        let text = fs::read_to_string(&built.paths[0]).unwrap();
        assert_eq!(text.lines().count(), 256);
        assert!(text
            .lines()
            .all(|l| l.contains("begin sigmoid <= 6'b") && l.contains("sigmoid_prime <= 4'b")));
    }

    #[test]
    fn paired_hex_writes_one_artifact_per_table() {
        let dir = tempfile::tempdir().unwrap();
        let spec = parse(
            "[table]\npaired = true\nsize = 256\nvalue_bits = 6\ndomain_bound = 2\n\n\
             [output]\nformat = \"hex\"\n",
        );

        let built = write_artifacts(&spec, dir.path()).unwrap();
        let names: Vec<_> = built
            .paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                artifact_name(built.tables[0].config(), "dat"),
                artifact_name(built.tables[1].config(), "dat"),
            ]
        );
        assert_eq!(names[1], "sigmoid_prime_table_size256_word4_maxdom2.dat");

        // 6-bit sigmoid codes take two hex digits, 4-bit derivative codes one.
        for (path, digits) in built.paths.iter().zip([2, 1]) {
            let text = fs::read_to_string(path).unwrap();
            assert_eq!(text.lines().count(), 256);
            assert!(text.lines().all(|l| l.len() == digits));
        }
        // sigmoid(-2) * 64 = 7.63 rounds to 8
        let sigmoid = fs::read_to_string(&built.paths[0]).unwrap();
        assert!(sigmoid.starts_with("08\n"));
    }

    #[test]
    fn paired_scale_is_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let spec = parse("[table]\npaired = true\nvalue_bits = 6\nscale_factor = 1.0\n");

        assert!(write_artifacts(&spec, dir.path()).is_err());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
