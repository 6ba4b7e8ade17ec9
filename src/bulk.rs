//! Bulk generation over a directory of sample documents
//!
//! Every `*.xml` file of the input directory is turned into a `<file>.py`
//! module in the output directory. With archives, every `*.zip` file of the
//! input directory is opened instead and each of its XML members becomes a
//! `<member file name>.py` module. Documents are processed independently on
//! a rayon pool; a failing document is recorded in the report and does not
//! stop the others.

use crate::codegen::Generator;
use crate::error::{Error, Result};
use crate::limits::Limits;
use rayon::prelude::*;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A document that could not be converted
#[derive(Debug)]
pub struct BulkFailure {
    /// Input file, or `<archive>/<member>` for archive members
    pub input: PathBuf,
    /// Why it failed
    pub error: Error,
}

/// Outcome of a bulk run
#[derive(Debug, Default)]
pub struct BulkReport {
    /// Generated modules, in input order
    pub generated: Vec<PathBuf>,
    /// Documents that failed
    pub failed: Vec<BulkFailure>,
}

impl BulkReport {
    /// Check if every document was converted
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of processed documents
    pub fn total(&self) -> usize {
        self.generated.len() + self.failed.len()
    }

    fn record(&mut self, input: PathBuf, result: Result<PathBuf>) {
        match result {
            Ok(output) => {
                tracing::info!(input = %input.display(), output = %output.display(), "generated");
                self.generated.push(output);
            }
            Err(error) => {
                tracing::warn!(input = %input.display(), %error, "generation failed");
                self.failed.push(BulkFailure { input, error });
            }
        }
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case(extension))
}

fn collect_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        Error::Resource(format!("Failed to read directory '{}': {}", dir.display(), e))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if has_extension(&path, extension) && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// List the XML files of a directory, sorted by name
pub fn collect_inputs(dir: &Path) -> Result<Vec<PathBuf>> {
    collect_files(dir, "xml")
}

/// List the zip archives of a directory, sorted by name
pub fn collect_archives(dir: &Path) -> Result<Vec<PathBuf>> {
    collect_files(dir, "zip")
}

/// Output path for an input document: `<out_dir>/<file name>.py`
pub fn output_path(input: &Path, out_dir: &Path) -> PathBuf {
    let mut name = input
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".py");
    out_dir.join(name)
}

/// Convert one document and write its module
pub fn generate_one(generator: &Generator, input: &Path, out_dir: &Path) -> Result<PathBuf> {
    let code = generator.generate_file(input)?;
    let output = output_path(input, out_dir);
    fs::write(&output, code)?;
    Ok(output)
}

/// One XML member read from an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    /// Name of the member inside the archive
    pub name: String,
    /// Document text
    pub xml: String,
}

/// Read the XML members of a zip archive, in archive order
///
/// Directories and members without an `.xml` extension are skipped.
pub fn read_archive(path: &Path, limits: &Limits) -> Result<Vec<ArchiveMember>> {
    let archive_error =
        |e: zip::result::ZipError| Error::Resource(format!("Failed to read archive '{}': {}", path.display(), e));

    let file = fs::File::open(path).map_err(|e| {
        Error::Resource(format!("Failed to open archive '{}': {}", path.display(), e))
    })?;
    let mut archive = zip::ZipArchive::new(file).map_err(archive_error)?;

    let mut members = Vec::new();
    for index in 0..archive.len() {
        let mut member = archive.by_index(index).map_err(archive_error)?;
        let name = member.name().to_string();
        if !member.is_file() || !has_extension(Path::new(&name), "xml") {
            continue;
        }
        limits.check_xml_size(usize::try_from(member.size()).unwrap_or(usize::MAX))?;

        let mut xml = String::new();
        member.read_to_string(&mut xml)?;
        tracing::debug!(archive = %path.display(), member = %name, bytes = xml.len(), "read archive member");
        members.push(ArchiveMember { name, xml });
    }
    Ok(members)
}

/// Convert one archive member and write its module
///
/// The module is named after the member's file name; directories inside the
/// archive are not recreated.
pub fn generate_member(generator: &Generator, member: &ArchiveMember, out_dir: &Path) -> Result<PathBuf> {
    let code = generator.generate_str(&member.xml)?;
    let output = output_path(Path::new(&member.name), out_dir);
    fs::write(&output, code)?;
    Ok(output)
}

fn build_pool(jobs: Option<usize>) -> Result<rayon::ThreadPool> {
    let mut pool = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = jobs {
        pool = pool.num_threads(jobs);
    }
    pool.build()
        .map_err(|e| Error::Other(format!("Failed to start worker pool: {}", e)))
}

/// Convert every XML document of `in_dir` into `out_dir`
///
/// `jobs` bounds the number of worker threads; `None` uses rayon's default.
/// Only failures to list the input directory, create the output directory
/// or start the pool are returned as errors.
pub fn generate_dir(
    generator: &Generator,
    in_dir: &Path,
    out_dir: &Path,
    jobs: Option<usize>,
) -> Result<BulkReport> {
    let inputs = collect_inputs(in_dir)?;
    fs::create_dir_all(out_dir)?;
    tracing::info!(
        in_dir = %in_dir.display(),
        out_dir = %out_dir.display(),
        documents = inputs.len(),
        "starting bulk generation"
    );

    let pool = build_pool(jobs)?;
    let results: Vec<(PathBuf, Result<PathBuf>)> = pool.install(|| {
        inputs
            .par_iter()
            .map(|input| (input.clone(), generate_one(generator, input, out_dir)))
            .collect()
    });

    let mut report = BulkReport::default();
    for (input, result) in results {
        report.record(input, result);
    }
    Ok(report)
}

/// Convert the XML members of every zip archive of `in_dir` into `out_dir`
///
/// An archive that cannot be read counts as one failure; its neighbours are
/// still processed.
pub fn generate_archives(
    generator: &Generator,
    in_dir: &Path,
    out_dir: &Path,
    jobs: Option<usize>,
) -> Result<BulkReport> {
    let archives = collect_archives(in_dir)?;
    fs::create_dir_all(out_dir)?;
    tracing::info!(
        in_dir = %in_dir.display(),
        out_dir = %out_dir.display(),
        archives = archives.len(),
        "starting bulk generation from archives"
    );

    let mut report = BulkReport::default();
    let mut members = Vec::new();
    for archive in &archives {
        match read_archive(archive, &generator.options().limits) {
            Ok(read) => members.extend(read.into_iter().map(|m| (archive.join(&m.name), m))),
            Err(error) => report.record(archive.clone(), Err(error)),
        }
    }

    let pool = build_pool(jobs)?;
    let results: Vec<(PathBuf, Result<PathBuf>)> = pool.install(|| {
        members
            .par_iter()
            .map(|(input, member)| (input.clone(), generate_member(generator, member, out_dir)))
            .collect()
    });

    for (input, result) in results {
        report.record(input, result);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_archive(path: &Path, members: &[(&str, &str)]) {
        let file = fs::File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .add_directory("orders/", zip::write::FileOptions::default())
            .unwrap();
        for (name, content) in members {
            writer
                .start_file(*name, zip::write::FileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_output_path() {
        let out = output_path(Path::new("in/order.xml"), Path::new("out"));
        assert_eq!(out, PathBuf::from("out/order.xml.py"));
    }

    #[test]
    fn test_collect_inputs_filters_and_sorts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.xml"), "<b/>").unwrap();
        fs::write(dir.path().join("a.XML"), "<a/>").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip").unwrap();
        fs::create_dir(dir.path().join("nested.xml")).unwrap();

        let inputs = collect_inputs(dir.path()).unwrap();
        let names: Vec<_> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.XML", "b.xml"]);
    }

    #[test]
    fn test_failures_are_isolated() {
        let in_dir = tempdir().unwrap();
        let out_dir = tempdir().unwrap();
        fs::write(in_dir.path().join("good.xml"), "<r><a>1</a></r>").unwrap();
        fs::write(in_dir.path().join("bad.xml"), "<r><a>1</r>").unwrap();

        let report = generate_dir(&Generator::new(), in_dir.path(), out_dir.path(), Some(2)).unwrap();

        assert_eq!(report.total(), 2);
        assert!(!report.is_success());
        assert_eq!(report.generated, vec![out_dir.path().join("good.xml.py")]);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].input.ends_with("bad.xml"));
        assert!(matches!(report.failed[0].error, Error::Xml(_)));

        let code = fs::read_to_string(out_dir.path().join("good.xml.py")).unwrap();
        assert!(code.contains("class R(base.BaseXmlParser):"));
    }

    #[test]
    fn test_missing_input_dir() {
        let out_dir = tempdir().unwrap();
        let result = generate_dir(
            &Generator::new(),
            Path::new("/no/such/input/dir"),
            out_dir.path(),
            None,
        );
        assert!(matches!(result, Err(Error::Resource(_))));
    }

    #[test]
    fn test_read_archive_keeps_xml_members() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("batch.zip");
        write_archive(
            &path,
            &[
                ("orders/po.xml", "<r><a>1</a></r>"),
                ("readme.txt", "skip"),
                ("second.XML", "<s/>"),
            ],
        );

        let members = read_archive(&path, &Limits::default()).unwrap();
        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["orders/po.xml", "second.XML"]);
        assert_eq!(members[0].xml, "<r><a>1</a></r>");
    }

    #[test]
    fn test_read_archive_size_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("batch.zip");
        write_archive(&path, &[("big.xml", "<r>0123456789012345678901234567890</r>")]);

        let limits = Limits {
            max_xml_size: 8,
            ..Limits::default()
        };
        assert!(matches!(read_archive(&path, &limits), Err(Error::LimitExceeded(_))));
    }

    #[test]
    fn test_generate_archives() {
        let in_dir = tempdir().unwrap();
        let out_dir = tempdir().unwrap();
        write_archive(
            &in_dir.path().join("a.zip"),
            &[
                ("orders/po.xml", "<r><a>1</a></r>"),
                ("notes.txt", "skip"),
                ("bad.xml", "<r><a>1</r>"),
            ],
        );
        fs::write(in_dir.path().join("broken.zip"), "not an archive").unwrap();
        fs::write(in_dir.path().join("loose.xml"), "<r/>").unwrap();

        let report = generate_archives(&Generator::new(), in_dir.path(), out_dir.path(), Some(2)).unwrap();

        assert_eq!(report.generated, vec![out_dir.path().join("po.xml.py")]);
        assert_eq!(report.failed.len(), 2);
        assert!(report.failed[0].input.ends_with("broken.zip"));
        assert!(matches!(report.failed[0].error, Error::Resource(_)));
        assert!(report.failed[1].input.ends_with("a.zip/bad.xml"));
        assert!(matches!(report.failed[1].error, Error::Xml(_)));

        let code = fs::read_to_string(out_dir.path().join("po.xml.py")).unwrap();
        assert!(code.starts_with(crate::codegen::PREAMBLE));
        assert!(code.contains("class R(base.BaseXmlParser):"));
    }
}
