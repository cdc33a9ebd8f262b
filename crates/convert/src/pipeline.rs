//! The staged parse, derive, build, pack sequence

use crate::context::ConvertCtx;
use crate::output::Conversion;
use async_trait::async_trait;
use csip_errors::Error;
use csip_package::InformationPackage;
use csip_staging::StagingRoot;
use csip_types::PackageType;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

enum Input<'a> {
    Path(&'a Path),
    Stream(&'a mut (dyn AsyncRead + Unpin + Send)),
}

enum Sink<'a> {
    File(&'a Path),
    Memory,
}

struct Outcome {
    conversion: Conversion,
    bytes: Option<Vec<u8>>,
}

/// One package conversion stage
///
/// Implementors describe how the destination package is derived; the
/// provided methods drive staging, parsing, building and packing.
#[async_trait]
pub trait Converter: Send + Sync {
    fn ctx(&self) -> &ConvertCtx;

    /// Type the input archive must declare
    fn source_type(&self) -> PackageType;

    /// Type of the produced package
    fn target_type(&self) -> PackageType;

    /// Name prefix of the staging root
    fn staging_prefix(&self) -> &'static str;

    /// Derive the unbuilt destination package from a parsed source
    ///
    /// Files synthesized for the destination are written under `work_dir`,
    /// which must outlive the build.
    async fn convert_package(
        &self,
        source: &InformationPackage,
        work_dir: &Path,
    ) -> Result<InformationPackage, Error>;

    /// Serialize the derived package under `target_dir`
    async fn build_package(
        &self,
        package: &InformationPackage,
        target_dir: &Path,
    ) -> Result<PathBuf, Error> {
        self.ctx().codec.build(package, target_dir).await
    }

    /// Convert the archive at `input` and write the result to `output`
    ///
    /// `output` is written through a temporary sibling and renamed into
    /// place, so it never holds a partial archive.
    ///
    /// # Errors
    ///
    /// Returns an I/O error for storage faults, a package format error if
    /// `input` is not a valid package of [`Converter::source_type`], and a
    /// build error for structural faults.
    async fn convert_to_path(&self, input: &Path, output: &Path) -> Result<Conversion, Error> {
        let outcome = run(self, Input::Path(input), Sink::File(output)).await?;
        Ok(outcome.conversion)
    }

    /// Convert the archive at `input` and write the result to `writer`
    ///
    /// Nothing is written unless the whole archive was produced.
    ///
    /// # Errors
    ///
    /// See [`Converter::convert_to_path`].
    async fn convert_to_writer<W>(&self, input: &Path, writer: &mut W) -> Result<Conversion, Error>
    where
        W: AsyncWrite + Unpin + Send,
    {
        let outcome = run(self, Input::Path(input), Sink::Memory).await?;
        emit(outcome, writer).await
    }

    /// Convert an archive read from `reader` and write the result to `writer`
    ///
    /// The input is spooled into the staging root before parsing.
    ///
    /// # Errors
    ///
    /// See [`Converter::convert_to_path`].
    async fn convert_reader<R, W>(&self, reader: &mut R, writer: &mut W) -> Result<Conversion, Error>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let outcome = run(self, Input::Stream(reader), Sink::Memory).await?;
        emit(outcome, writer).await
    }
}

async fn emit<W>(outcome: Outcome, writer: &mut W) -> Result<Conversion, Error>
where
    W: AsyncWrite + Unpin + Send,
{
    if let Some(bytes) = outcome.bytes {
        writer.write_all(&bytes).await?;
        writer.flush().await?;
    }
    Ok(outcome.conversion)
}

async fn run<C>(converter: &C, input: Input<'_>, sink: Sink<'_>) -> Result<Outcome, Error>
where
    C: Converter + ?Sized,
{
    let mut root = converter
        .ctx()
        .staging
        .acquire(converter.staging_prefix())
        .await?;

    let result = stages(converter, &root, input, sink).await;

    // Drop retries if this fails
    if let Err(e) = root.release().await {
        tracing::warn!(path = %root.path().display(), error = %e, "staging root not fully removed");
    }
    result
}

async fn stages<C>(
    converter: &C,
    root: &StagingRoot,
    input: Input<'_>,
    sink: Sink<'_>,
) -> Result<Outcome, Error>
where
    C: Converter + ?Sized,
{
    let source_type = converter.source_type();
    let target_type = converter.target_type();
    let extract_dir = root.subdir(&extracted_prefix(source_type)).await?;
    let build_dir = root.subdir(&extracted_prefix(target_type)).await?;

    let archive = match input {
        Input::Path(path) => path.to_path_buf(),
        Input::Stream(reader) => spool(reader, root).await?,
    };

    let source = converter
        .ctx()
        .codec
        .parse(&archive, &extract_dir, source_type)
        .await?;
    let package = converter.convert_package(&source, root.path()).await?;
    converter.build_package(&package, &build_dir).await?;

    let (entries, bytes) = match sink {
        Sink::File(output) => (csip_archive::pack_to_file(&build_dir, output).await?, None),
        Sink::Memory => {
            let packed = csip_archive::pack(&build_dir).await?;
            (packed.entries, Some(packed.bytes))
        }
    };

    tracing::info!(
        source_id = %source.id,
        id = %package.id,
        from = %source_type,
        to = %target_type,
        entries = entries.len(),
        "converted package"
    );
    Ok(Outcome {
        conversion: Conversion::new(package, entries),
        bytes,
    })
}

fn extracted_prefix(package_type: PackageType) -> String {
    format!("{}-extracted", package_type.as_str().to_ascii_lowercase())
}

async fn spool(
    reader: &mut (dyn AsyncRead + Unpin + Send),
    root: &StagingRoot,
) -> Result<PathBuf, Error> {
    let dir = root.subdir("input").await?;
    let path = dir.join("package.zip");
    let mut file = File::create(&path)
        .await
        .map_err(|e| Error::io_with_path(&e, &path))?;
    let copied = tokio::io::copy(reader, &mut file).await?;
    file.flush().await?;
    tracing::debug!(path = %path.display(), bytes = copied, "spooled input archive");
    Ok(path)
}
