use std::env;
use std::path::Path;
use std::process;
use vidgallery::remote::extract_video_id;
use vidgallery::{extract_upload_thumbnail, resolve_remote_thumbnail, GalleryConfig, GalleryResult};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: gallery_thumb <video-file | youtube-url> [config.toml]");
        eprintln!("Example: gallery_thumb uploads/holiday.mp4 gallery.toml");
        process::exit(2);
    }

    if let Err(e) = run(&args[1], args.get(2).map(String::as_str)).await {
        eprintln!("gallery_thumb: {} ({:?})", e, e.kind());
        process::exit(1);
    }
}

async fn run(source: &str, config_path: Option<&str>) -> GalleryResult<()> {
    let config = match config_path {
        Some(path) => GalleryConfig::load(Path::new(path))?,
        None => GalleryConfig::default(),
    };
    config.ensure_dirs()?;

    let is_url = source.starts_with("http://") || source.starts_with("https://");
    if is_url || extract_video_id(source).is_some() {
        let remote = resolve_remote_thumbnail(source, &config).await?;
        println!("{}\t{}", remote.filename, remote.title);
    } else {
        let filename = extract_upload_thumbnail(source, &config).await?;
        println!("{}", filename);
    }
    Ok(())
}
