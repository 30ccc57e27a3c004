//! Network commands.

use super::Context;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use scriptkit_http::{
    DataType, ImageParams, ImageResolver, Method, RequestBody, RequestOutcome, RequestParams,
    ResponseBody, ResponseType, UploadParams, UploadSource,
};
use scriptkit_storage::{FileManager, Image, StorageScope};
use std::path::{Path, PathBuf};
use tracing::warn;

pub struct FetchArgs {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub data_type: DataType,
    pub use_cache: bool,
    pub timeout_ms: Option<u64>,
    pub out: Option<PathBuf>,
}

pub struct UploadArgs {
    pub url: String,
    pub name: String,
    pub file: Option<PathBuf>,
    pub image: Option<PathBuf>,
    pub filename: Option<String>,
    pub fields: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

fn print_response(response: &ResponseType, out: Option<&Path>, format: OutputFormat) -> Result<()> {
    if let Some(out) = out {
        match &response.data {
            ResponseBody::Image(image) => std::fs::write(out, image.to_png()?)?,
            ResponseBody::Data(bytes) => std::fs::write(out, bytes)?,
            ResponseBody::Text(text) => std::fs::write(out, text)?,
            ResponseBody::Json(value) => std::fs::write(out, serde_json::to_vec_pretty(value)?)?,
        }
    }

    if let OutputFormat::Json = format {
        return output::print_json(response);
    }

    output::print_row("URL", &response.url);
    output::print_row("Status", &response.status_code.to_string());
    output::print_row("MIME type", response.mime_type.as_deref().unwrap_or("-"));
    for cookie in &response.cookies {
        output::print_row("Cookie", &format!("{}={}", cookie.name, cookie.value));
    }
    output::print_divider();
    match &response.data {
        ResponseBody::Json(value) => println!("{}", serde_json::to_string_pretty(value)?),
        ResponseBody::Text(text) => println!("{}", text),
        ResponseBody::Image(image) => println!("image {}x{}", image.width(), image.height()),
        ResponseBody::Data(bytes) => println!("{} bytes", bytes.len()),
    }
    Ok(())
}

fn finish(outcome: RequestOutcome, out: Option<&Path>, format: OutputFormat) -> Result<()> {
    match outcome {
        RequestOutcome::Fetched(response) | RequestOutcome::Cached(response) => {
            print_response(&response, out, format)
        }
        RequestOutcome::Fallback { response, error } => {
            warn!(%error, "showing cached response");
            eprintln!("Request failed ({error}); showing cached response");
            print_response(&response, out, format)
        }
        RequestOutcome::Failed(error) => Err(error.into()),
    }
}

pub async fn fetch(ctx: &Context, args: FetchArgs, format: OutputFormat) -> Result<()> {
    let mut params = RequestParams::get(args.url)
        .method(args.method)
        .data_type(args.data_type)
        .use_cache(args.use_cache)
        .timeout_ms(args.timeout_ms.unwrap_or(ctx.config.request_timeout_ms));
    for (name, value) in args.headers {
        params = params.header(name, value);
    }
    if let Some(body) = args.body {
        params = params.body(RequestBody::Text(body));
    }

    let outcome = ctx.http_client()?.request(params).await;
    finish(outcome, args.out.as_deref(), format)
}

pub async fn upload(ctx: &Context, args: UploadArgs, format: OutputFormat) -> Result<()> {
    let source = match (args.file, args.image) {
        (Some(path), None) => UploadSource::File(path),
        (None, Some(path)) => UploadSource::Image(Image::from_bytes(&std::fs::read(path)?)?),
        _ => anyhow::bail!("exactly one of --file or --image is required"),
    };

    let mut params = UploadParams::new(args.url, args.name, source);
    params.timeout_ms = ctx.config.request_timeout_ms;
    if let Some(filename) = args.filename {
        params = params.filename(filename);
    }
    for (name, value) in args.fields {
        params = params.field(name, value);
    }
    for (name, value) in args.headers {
        params = params.header(name, value);
    }

    let outcome = ctx.http_client()?.upload_file(params).await;
    finish(outcome, None, format)
}

pub async fn image(
    ctx: &Context,
    params: ImageParams,
    out: &Path,
    format: OutputFormat,
) -> Result<()> {
    let resolver = ImageResolver::new(
        ctx.http_client()?,
        ctx.store(StorageScope::Temporary)?,
        FileManager::durable(&ctx.paths),
    );
    let image = resolver.get_image(params).await;
    std::fs::write(out, image.to_png()?)?;

    let (width, height) = image.size();
    output::print(
        &serde_json::json!({"path": out, "width": width, "height": height}),
        &format!("Wrote {}x{} image to {}", width, height, out.display()),
        format,
    )
}
