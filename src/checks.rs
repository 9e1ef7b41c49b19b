//! Contract checks against a [`PartitionApi`].
//!
//! Each check submits one or more requests and returns `Ok(())` when every
//! invariant held. The first violation ends the check with a
//! [`SmokeError`] carrying the offending body or values.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::cases::{
    GzipCase, HappyPathCase, RoundTripCase, TableCase, EXPECTED_TABLE_FRAGMENT, MIN_TEXT_LEN,
    REFERENCE_PDF, REFERENCE_PDF_CONTENT_TYPE,
};
use crate::config::HarnessConfig;
use crate::contract::{DocumentRequest, OutputFormat, PartitionApi, Strategy};
use crate::error::SmokeError;
use crate::fixture::{resolve_document, sha256_file, GzipFixture};
use crate::response::{csv_row_count, PartitionResult, TEXT_AS_HTML};

/// Submits `request` as JSON, checks shape and text, then resubmits it as CSV
/// and checks that the row count matches the element count.
pub async fn json_and_csv_parity<A>(
    api: &A,
    request: DocumentRequest,
    context: &str,
) -> Result<PartitionResult, SmokeError>
where
    A: PartitionApi + ?Sized,
{
    let request = request.with_output_format(OutputFormat::Json);
    let result = submit_json(api, &request).await?;
    if result.is_empty() {
        return Err(SmokeError::assertion(context, "JSON result is empty"));
    }
    ensure_text_lengths(&result, context)?;

    let csv_request = request.with_output_format(OutputFormat::Csv);
    let csv = api.send_document(&csv_request).await?;
    csv.ensure_ok()?;
    if csv.body.is_empty() {
        return Err(SmokeError::assertion(context, "CSV body is empty"));
    }
    let rows = csv_row_count(&csv.body)?;
    let elements = result.element_count();
    debug!(context, rows, elements, "Compared CSV rows to JSON elements");
    if rows != elements {
        return Err(SmokeError::assertion(
            context,
            format!("CSV has {rows} rows but JSON has {elements} elements"),
        ));
    }
    Ok(result)
}

async fn submit_json<A>(api: &A, request: &DocumentRequest) -> Result<PartitionResult, SmokeError>
where
    A: PartitionApi + ?Sized,
{
    let response = api.send_document(request).await?;
    response.ensure_ok()?;
    PartitionResult::parse(&response.body, request.is_multi_file())
}

/// Per file for multi-file results, in aggregate otherwise.
fn ensure_text_lengths(result: &PartitionResult, context: &str) -> Result<(), SmokeError> {
    for (index, len) in result.text_lengths().into_iter().enumerate() {
        if len <= MIN_TEXT_LEN {
            return Err(SmokeError::assertion(
                context,
                format!(
                    "extracted text of file #{index} has {len} characters, \
                     expected more than {MIN_TEXT_LEN}"
                ),
            ));
        }
    }
    Ok(())
}

pub async fn happy_path<A>(
    api: &A,
    config: &HarnessConfig,
    case: &HappyPathCase,
) -> Result<(), SmokeError>
where
    A: PartitionApi + ?Sized,
{
    let path = resolve_document(&config.sample_docs_dir, case.filename);
    info!(file = case.filename, content_type = case.content_type, "Checking happy path");
    let request = DocumentRequest::new(vec![path]).with_content_type(case.content_type);
    json_and_csv_parity(api, request, case.filename).await?;
    Ok(())
}

/// Gzips the case's fixtures into scoped temp files, sends them alongside the
/// verbatim files, and checks the result in the requested output format.
pub async fn gzip_sending<A>(
    api: &A,
    config: &HarnessConfig,
    case: &GzipCase,
    output_format: OutputFormat,
) -> Result<(), SmokeError>
where
    A: PartitionApi + ?Sized,
{
    let fixtures = case
        .to_gzip
        .iter()
        .map(|name| GzipFixture::create(&resolve_document(&config.sample_docs_dir, name)))
        .collect::<Result<Vec<_>, _>>()?;
    let gzipped: Vec<PathBuf> = fixtures.iter().map(|f| f.path().to_path_buf()).collect();
    let verbatim: Vec<PathBuf> = case
        .verbatim
        .iter()
        .map(|name| resolve_document(&config.sample_docs_dir, name))
        .collect();

    let context = format!("{} + {}", case.to_gzip.join(","), case.verbatim.join(","));
    info!(context = %context, %output_format, "Checking gzip sending");

    let request = DocumentRequest::new(verbatim)
        .with_gzipped(gzipped)
        .with_content_type(case.uncompressed_content_type)
        .with_uncompressed_content_type(case.uncompressed_content_type);

    // Both encodings are always fetched; the order follows the requested one.
    match output_format {
        OutputFormat::Json => {
            json_and_csv_parity(api, request, &context).await?;
        }
        OutputFormat::Csv => {
            let rows = {
                let csv = api
                    .send_document(&request.clone().with_output_format(OutputFormat::Csv))
                    .await?;
                csv.ensure_ok()?;
                if csv.body.is_empty() {
                    return Err(SmokeError::assertion(&context, "CSV body is empty"));
                }
                csv_row_count(&csv.body)?
            };
            let result = submit_json(api, &request).await?;
            if result.is_empty() {
                return Err(SmokeError::assertion(&context, "JSON result is empty"));
            }
            ensure_text_lengths(&result, &context)?;
            if rows != result.element_count() {
                return Err(SmokeError::assertion(
                    &context,
                    format!(
                        "CSV has {rows} rows but JSON has {} elements",
                        result.element_count()
                    ),
                ));
            }
        }
    }

    drop(fixtures);
    Ok(())
}

/// `hi_res` must take more than `performance_ratio` times as long as `fast`.
pub async fn strategy_performance<A>(api: &A, config: &HarnessConfig) -> Result<(), SmokeError>
where
    A: PartitionApi + ?Sized,
{
    let path = resolve_document(&config.sample_docs_dir, REFERENCE_PDF);
    let request = DocumentRequest::new(vec![path]).with_content_type(REFERENCE_PDF_CONTENT_TYPE);

    let hi_res = api
        .send_document(&request.clone().with_strategy(Strategy::HiRes))
        .await?;
    hi_res.ensure_ok()?;
    let fast = api
        .send_document(&request.with_strategy(Strategy::Fast))
        .await?;
    fast.ensure_ok()?;

    let hi_res_secs = hi_res.elapsed.as_secs_f64();
    let fast_secs = fast.elapsed.as_secs_f64();
    info!(hi_res_secs, fast_secs, ratio = config.performance_ratio, "Measured strategy timings");

    if hi_res_secs > config.performance_ratio * fast_secs {
        Ok(())
    } else {
        Err(SmokeError::assertion(
            REFERENCE_PDF,
            format!(
                "hi_res took {hi_res_secs:.3}s, not more than {} x fast ({fast_secs:.3}s)",
                config.performance_ratio
            ),
        ))
    }
}

pub async fn table_support<A>(
    api: &A,
    config: &HarnessConfig,
    case: &TableCase,
) -> Result<(), SmokeError>
where
    A: PartitionApi + ?Sized,
{
    let path = resolve_document(&config.sample_docs_dir, REFERENCE_PDF);
    let request = DocumentRequest::new(vec![path])
        .with_content_type(REFERENCE_PDF_CONTENT_TYPE)
        .with_strategy(case.strategy)
        .with_skip_infer_table_types(case.skip_infer_table_types.iter().copied());

    let result = submit_json(api, &request).await?;
    let tables = result.tables();
    info!(
        strategy = %case.strategy,
        skipped = ?case.skip_infer_table_types,
        found = tables.len(),
        expected = case.expected_tables,
        "Counted rendered tables"
    );

    let context = format!("{} / skip {:?}", case.strategy, case.skip_infer_table_types);
    if tables.len() != case.expected_tables {
        return Err(SmokeError::assertion(
            context,
            format!(
                "expected {} rendered tables, found {}",
                case.expected_tables,
                tables.len()
            ),
        ));
    }
    if let Some(first) = tables.first() {
        let Some(html) = first.text_as_html() else {
            return Err(SmokeError::assertion(
                context,
                format!(
                    "first table's {TEXT_AS_HTML} is not a string: {}",
                    first.metadata[TEXT_AS_HTML]
                ),
            ));
        };
        if !html.contains(EXPECTED_TABLE_FRAGMENT) {
            return Err(SmokeError::assertion(
                context,
                format!("first rendered table lacks {EXPECTED_TABLE_FRAGMENT:?}: {html}"),
            ));
        }
    }
    Ok(())
}

/// Decompressing a gzip copy and sending it verbatim must pass or fail the
/// text-length check exactly like sending the gzip copy with a declared type.
pub async fn gzip_round_trip<A>(
    api: &A,
    config: &HarnessConfig,
    case: &RoundTripCase,
) -> Result<(), SmokeError>
where
    A: PartitionApi + ?Sized,
{
    let source = resolve_document(&config.sample_docs_dir, case.filename);
    let fixture = GzipFixture::create(&source)?;
    let restored = fixture.decompress()?;

    let original_digest = sha256_file(&source)?;
    let restored_digest = sha256_file(restored.path())?;
    if original_digest != restored_digest {
        return Err(SmokeError::assertion(
            case.filename,
            format!("decompressed copy hashes to {restored_digest}, original to {original_digest}"),
        ));
    }

    let verbatim = DocumentRequest::new(vec![restored.path().to_path_buf()])
        .with_content_type(case.content_type);
    let gzipped = DocumentRequest::new(vec![])
        .with_gzipped(vec![fixture.path().to_path_buf()])
        .with_content_type(case.content_type)
        .with_uncompressed_content_type(case.content_type);

    let verbatim_passes = passes_text_check(api, &verbatim).await?;
    let gzipped_passes = passes_text_check(api, &gzipped).await?;
    info!(file = case.filename, verbatim_passes, gzipped_passes, "Compared round-trip outcomes");

    if verbatim_passes != gzipped_passes {
        return Err(SmokeError::assertion(
            case.filename,
            format!(
                "verbatim text check {} but gzip text check {}",
                outcome(verbatim_passes),
                outcome(gzipped_passes)
            ),
        ));
    }
    Ok(())
}

async fn passes_text_check<A>(api: &A, request: &DocumentRequest) -> Result<bool, SmokeError>
where
    A: PartitionApi + ?Sized,
{
    let result = submit_json(api, request).await?;
    Ok(!result.is_empty() && ensure_text_lengths(&result, "").is_ok())
}

fn outcome(passed: bool) -> &'static str {
    if passed {
        "passed"
    } else {
        "failed"
    }
}
