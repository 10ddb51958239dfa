use anyhow::{Context, bail};
use ser_rawvideo_rs::logger;
use ser_rawvideo_rs::ser_pipeline::{
    FrameRange, PipelineConfig, SerToRawVideoPipeline, StreamRawVideoWriter,
};

use tracing::{error, info};

const USAGE: &str = "usage: ser_rawvideo <file.ser> [start] [end] [step] [framerate]";
const DEFAULT_FRAMERATE: &str = "30";

/// Positional arguments; missing range bounds default to the whole file.
#[derive(Debug, PartialEq)]
struct Args {
    path: String,
    start: Option<usize>,
    end: Option<usize>,
    step: usize,
    framerate: String,
}

fn parse_index(arg: Option<String>, name: &str) -> anyhow::Result<Option<usize>> {
    arg.map(|value| value.parse::<usize>().with_context(|| format!("invalid {name}: {value}")))
        .transpose()
}

fn parse_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Args> {
    let Some(path) = args.next() else {
        bail!(USAGE);
    };
    Ok(Args {
        path,
        start: parse_index(args.next(), "start")?,
        end: parse_index(args.next(), "end")?,
        step: parse_index(args.next(), "step")?.unwrap_or(1),
        framerate: args.next().unwrap_or_else(|| DEFAULT_FRAMERATE.to_string()),
    })
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let args = parse_args(std::env::args().skip(1))?;

    let pipeline = SerToRawVideoPipeline::open(&args.path, PipelineConfig::default())
        .with_context(|| format!("failed to open {}", args.path))?;

    let frame_count = pipeline.reader().frame_count();
    let range = FrameRange::new(args.start.unwrap_or(1), args.end.unwrap_or(frame_count))
        .with_step(args.step);
    let spec = pipeline.raw_video_spec(args.framerate.as_str());

    info!("Reading {} ({} frames)", args.path, frame_count);
    info!("Encoder input: {}", spec.input_args().join(" "));

    let stdout = std::io::stdout();
    let mut writer = StreamRawVideoWriter::new(stdout.lock());
    match pipeline.run(range, &mut writer) {
        Ok(delivered) => info!("Wrote {} frames", delivered),
        Err(e) => {
            error!("Conversion failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
