mod logging;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use pdfops_auth::Credentials;
use pdfops_config::Config;
use pdfops_io::FileRef;
use pdfops_operation::{
    CombineFiles, CompressPdf, CreatePdf, DocumentMerge, ExecutionContext, ExtractPdf, OcrPdf,
    PageManipulation, PdfProperties, ProtectPdf,
};
use pdfops_options::{
    CompressPdfOptions, CompressionLevel, ContentEncryption, CreatePdfFromHtmlOptions,
    DocumentMergeOptions, EncryptionAlgorithm, ExtractElementType, ExtractPdfOptions,
    ExtractRenditionsElementType, Fragments, OcrOptions, OcrSupportedLocale, OcrSupportedType,
    OutputFormat, PageActions, PageLayout, PageRanges, PasswordProtectOptions,
    PdfPropertiesOptions, Permission, Permissions, RotationAngle, TableStructureType,
};
use pdfops_types::PdfOpsError;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pdfops", version, about = "pdfops: run PDF operations in the cloud")]
struct Cli {
    /// Service credentials (JSON).
    #[arg(long, global = true, value_name = "FILE", default_value = "pdfops-credentials.json")]
    credentials: PathBuf,
    /// Client and logging configuration (YAML).
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct Io {
    /// Input file path, or URL where the operation accepts one.
    input: String,
    /// Where to save the result. The extension is replaced by the result's.
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reduce the size of a PDF.
    Compress {
        #[command(flatten)]
        io: Io,
        #[arg(long)]
        level: Option<CompressionLevel>,
    },
    /// Make a scanned PDF searchable.
    Ocr {
        #[command(flatten)]
        io: Io,
        /// Recognition language, e.g. en-US.
        #[arg(long)]
        lang: Option<OcrSupportedLocale>,
        #[arg(long = "type")]
        ocr_type: Option<OcrSupportedType>,
    },
    /// Password-protect a PDF.
    Protect {
        #[command(flatten)]
        io: Io,
        #[arg(long)]
        user_password: Option<String>,
        #[arg(long)]
        owner_password: Option<String>,
        #[arg(long, default_value = "AES_256")]
        algorithm: EncryptionAlgorithm,
        #[arg(long)]
        content: Option<ContentEncryption>,
        /// Repeatable, e.g. --permission PRINT_LOW_QUALITY.
        #[arg(long = "permission")]
        permissions: Vec<Permission>,
    },
    /// Extract text, tables and figures into a zip archive.
    Extract {
        #[command(flatten)]
        io: Io,
        #[arg(long, value_delimiter = ',', default_value = "text")]
        elements: Vec<ExtractElementType>,
        #[arg(long, value_delimiter = ',')]
        renditions: Vec<ExtractRenditionsElementType>,
        #[arg(long)]
        table_format: Option<TableStructureType>,
        #[arg(long)]
        char_bounds: bool,
        #[arg(long)]
        styling: bool,
    },
    /// Convert an HTML file, zip bundle or URL to PDF.
    HtmlToPdf {
        #[command(flatten)]
        io: Io,
        #[arg(long)]
        no_header_footer: bool,
        /// Page width in inches.
        #[arg(long)]
        page_width: Option<f64>,
        /// Page height in inches.
        #[arg(long)]
        page_height: Option<f64>,
        /// JSON object merged into a dynamic HTML template.
        #[arg(long, value_name = "FILE")]
        data: Option<PathBuf>,
    },
    /// Convert an office document, image or text file to PDF.
    Create {
        #[command(flatten)]
        io: Io,
    },
    /// Fill a Word template with JSON data.
    DocumentMerge {
        #[command(flatten)]
        io: Io,
        /// JSON object with the merge data.
        #[arg(long, value_name = "FILE")]
        data: PathBuf,
        #[arg(long, default_value = "pdf")]
        format: OutputFormat,
        /// JSON array (or object) of template fragments.
        #[arg(long, value_name = "FILE")]
        fragments: Option<PathBuf>,
    },
    /// Write document properties as JSON.
    Properties {
        #[command(flatten)]
        io: Io,
        #[arg(long)]
        page_level: bool,
    },
    /// Combine PDFs. Append `:RANGES` to an input to select pages, e.g. `a.pdf:1-3,5`.
    Combine {
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<String>,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Rotate pages of a PDF.
    Rotate {
        #[command(flatten)]
        io: Io,
        /// Pages to rotate, e.g. `1,3-5,8-`.
        #[arg(long)]
        pages: PageRanges,
        #[arg(long, default_value = "90")]
        angle: RotationAngle,
    },
    /// Delete pages from a PDF.
    DeletePages {
        #[command(flatten)]
        io: Io,
        /// Pages to delete, e.g. `2-3`.
        #[arg(long)]
        pages: PageRanges,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("config error: {e}"))?;
    let _guard = logging::init(&config.log)?;

    let credentials = Credentials::from_file(&cli.credentials)
        .with_context(|| format!("loading credentials from {}", cli.credentials.display()))?;
    let ctx = ExecutionContext::create(credentials, config.client)?;

    match run(&ctx, cli.command).await {
        Ok(path) => {
            println!("{}", path.display());
            Ok(())
        }
        Err(e) => {
            if let Some(id) = e
                .downcast_ref::<PdfOpsError>()
                .and_then(PdfOpsError::request_tracking_id)
            {
                tracing::error!(request_id = %id, "operation failed");
            }
            Err(e)
        }
    }
}

async fn run(ctx: &ExecutionContext, command: Commands) -> Result<PathBuf> {
    let (mut result, output) = match command {
        Commands::Compress { io, level } => {
            let mut builder = CompressPdfOptions::builder();
            if let Some(level) = level {
                builder = builder.compression_level(level);
            }
            let mut op = CompressPdf::create_new(builder.build());
            op.set_input(file_ref(&io.input)?);
            (op.execute(ctx).await?, io.output)
        }
        Commands::Ocr { io, lang, ocr_type } => {
            let mut builder = OcrOptions::builder();
            if let Some(lang) = lang {
                builder = builder.ocr_lang(lang);
            }
            if let Some(t) = ocr_type {
                builder = builder.ocr_type(t);
            }
            let mut op = OcrPdf::create_new(builder.build());
            op.set_input(file_ref(&io.input)?);
            (op.execute(ctx).await?, io.output)
        }
        Commands::Protect {
            io,
            user_password,
            owner_password,
            algorithm,
            content,
            permissions,
        } => {
            let mut builder = PasswordProtectOptions::builder()
                .encryption_algorithm(algorithm)
                .permissions(permissions.into_iter().collect::<Permissions>());
            if let Some(p) = user_password {
                builder = builder.user_password(p)?;
            }
            if let Some(p) = owner_password {
                builder = builder.owner_password(p)?;
            }
            if let Some(c) = content {
                builder = builder.content_encryption(c);
            }
            let mut op = ProtectPdf::create_new(builder.build());
            op.set_input(file_ref(&io.input)?);
            (op.execute(ctx).await?, io.output)
        }
        Commands::Extract {
            io,
            elements,
            renditions,
            table_format,
            char_bounds,
            styling,
        } => {
            let mut builder = ExtractPdfOptions::builder()
                .elements_to_extract(elements)
                .renditions_to_extract(renditions)
                .char_bounds(char_bounds)
                .include_styling(styling);
            if let Some(f) = table_format {
                builder = builder.table_output_format(f);
            }
            let mut op = ExtractPdf::create_new(builder.build());
            op.set_input(file_ref(&io.input)?);
            (op.execute(ctx).await?, io.output)
        }
        Commands::HtmlToPdf {
            io,
            no_header_footer,
            page_width,
            page_height,
            data,
        } => {
            let defaults = PageLayout::default();
            let layout = PageLayout::new(
                page_width.unwrap_or(defaults.page_width()),
                page_height.unwrap_or(defaults.page_height()),
            );
            let mut builder = CreatePdfFromHtmlOptions::builder()
                .include_header_footer(!no_header_footer)
                .page_layout(layout);
            if let Some(path) = data {
                builder = builder.data_to_merge(read_json(&path)?);
            }
            let mut op = CreatePdf::create_new();
            op.set_options(builder.build());
            op.set_input(file_ref(&io.input)?);
            (op.execute(ctx).await?, io.output)
        }
        Commands::Create { io } => {
            let mut op = CreatePdf::create_new();
            op.set_input(file_ref(&io.input)?);
            (op.execute(ctx).await?, io.output)
        }
        Commands::DocumentMerge {
            io,
            data,
            format,
            fragments,
        } => {
            let mut builder = DocumentMergeOptions::builder()
                .json_data_for_merge(read_json(&data)?)
                .output_format(format);
            if let Some(path) = fragments {
                let mut list = Fragments::new();
                match read_json(&path)? {
                    Value::Array(items) => list.add_fragments(items),
                    other => list.add_fragment(other),
                }
                builder = builder.fragments(list);
            }
            let mut op = DocumentMerge::create_new(builder.build());
            op.set_input(file_ref(&io.input)?);
            (op.execute(ctx).await?, io.output)
        }
        Commands::Properties { io, page_level } => {
            let options = PdfPropertiesOptions::builder()
                .include_page_level_properties(page_level)
                .build();
            let mut op = PdfProperties::create_new(options);
            op.set_input(file_ref(&io.input)?);
            (op.execute(ctx).await?, io.output)
        }
        Commands::Combine { inputs, output } => {
            let mut op = CombineFiles::create_new();
            for spec in &inputs {
                let (path, ranges) = split_page_selection(spec);
                op.add_input(FileRef::from_local_file(path, None)?, ranges);
            }
            (op.execute(ctx).await?, output)
        }
        Commands::Rotate { io, pages, angle } => {
            let mut op = PageManipulation::create_new(PageActions::new().rotate(pages, angle));
            op.set_input(file_ref(&io.input)?);
            (op.execute(ctx).await?, io.output)
        }
        Commands::DeletePages { io, pages } => {
            let mut op = PageManipulation::create_new(PageActions::new().delete(pages));
            op.set_input(file_ref(&io.input)?);
            (op.execute(ctx).await?, io.output)
        }
    };
    Ok(result.save_as_file(&output).await?)
}

fn file_ref(input: &str) -> Result<FileRef, PdfOpsError> {
    if input.starts_with("http://") || input.starts_with("https://") {
        FileRef::from_url(input)
    } else {
        FileRef::from_local_file(input, None)
    }
}

/// Splits `a.pdf:1-3,5` into the path and its page selection. A suffix that
/// is not a valid selection stays part of the path.
fn split_page_selection(spec: &str) -> (&str, Option<PageRanges>) {
    if let Some((path, ranges)) = spec.rsplit_once(':')
        && let Ok(ranges) = ranges.parse::<PageRanges>()
    {
        return (path, Some(ranges));
    }
    (spec, None)
}

fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_page_selection() {
        let (path, ranges) = split_page_selection("a.pdf:1-3,5");
        assert_eq!(path, "a.pdf");
        assert_eq!(ranges.unwrap().ranges().len(), 2);

        assert_eq!(split_page_selection("b.pdf"), ("b.pdf", None));
        assert_eq!(split_page_selection(r"C:\docs\c.pdf").0, r"C:\docs\c.pdf");
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::try_parse_from([
            "pdfops",
            "compress",
            "in.pdf",
            "--output",
            "out.pdf",
            "--level",
            "medium",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Compress {
                level: Some(CompressionLevel::Medium),
                ..
            }
        ));

        let cli = Cli::try_parse_from([
            "pdfops", "rotate", "in.pdf", "-o", "out.pdf", "--pages", "1,3-4", "--angle", "180",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Rotate {
                angle: RotationAngle::Deg180,
                ..
            }
        ));

        assert!(
            Cli::try_parse_from(["pdfops", "ocr", "in.pdf", "-o", "o.pdf", "--lang", "xx-XX"])
                .is_err()
        );
    }

    #[test]
    fn test_file_ref_picks_url_or_path() {
        assert!(file_ref("https://example.com/a.html").unwrap().url().is_some());
        assert!(file_ref("local.pdf").unwrap().local_path().is_some());
    }
}
