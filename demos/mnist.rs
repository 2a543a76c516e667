//! MNIST continual-learning run.
//!
//! ```text
//! cargo run --release --example mnist --features serde -- <idx-dir> [model.json] [epochs]
//! ```
//!
//! `<idx-dir>` holds the four standard `*-ubyte` files. Without a model
//! file, training starts from a dense model. Set `RUST_LOG=tsetlin_mcu=debug`
//! to see per-epoch accuracy.

use std::{env, fs, path::Path, time::Instant};

use tsetlin_mcu::{
    BitWidth, Config, FitOptions, Model, Quantizer, TrainConfig,
    idx::{self, Images}
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn encode(q: &Quantizer, images: &Images, labels: &[u8]) -> (Vec<Vec<u8>>, Vec<usize>) {
    let x = images.iter().map(|img| q.encode(img)).collect();
    let y = labels.iter().map(|&l| usize::from(l)).collect();
    (x, y)
}

fn load_split(dir: &Path, prefix: &str, q: &Quantizer) -> Result<(Vec<Vec<u8>>, Vec<usize>), BoxError> {
    let images = idx::read_images(dir.join(format!("{prefix}-images-idx3-ubyte")))?;
    let labels = idx::read_labels(dir.join(format!("{prefix}-labels-idx1-ubyte")))?;
    if images.len() != labels.len() {
        return Err(format!("{prefix}: {} images but {} labels", images.len(), labels.len()).into());
    }
    Ok(encode(q, &images, &labels))
}

fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("tsetlin_mcu=info".parse()?)
        )
        .init();

    let mut args = env::args().skip(1);
    let dir = args.next().ok_or("usage: mnist <idx-dir> [model.json] [epochs]")?;
    let model_path = args.next();
    let epochs: usize = args.next().map(|e| e.parse()).transpose()?.unwrap_or(5);

    let q = Quantizer::mnist(BitWidth::Eight);
    let dir = Path::new(&dir);
    let (x_train, y_train) = load_split(dir, "train", &q)?;
    let (x_test, y_test) = load_split(dir, "t10k", &q)?;
    tracing::info!(train = x_train.len(), test = x_test.len(), "dataset loaded");

    let mut model = match model_path.as_deref() {
        Some(path) if path != "-" => serde_json::from_str::<Model>(&fs::read_to_string(path)?)?,
        _ => {
            let config = Config::builder()
                .classes(10)
                .features(q.encoded_len(28 * 28))
                .clauses(20)
                .states(200)
                .build()?;
            Model::dense(config)?
        }
    };

    let before = model.accuracy(&x_test, &y_test);
    println!("Test accuracy before training: {:.2}%", before * 100.0);

    let params = TrainConfig::default();
    let opts = FitOptions::new(epochs, 42).with_callback(|epoch, acc| {
        println!("  epoch {epoch}: train {:.2}%", acc * 100.0);
        true
    });

    let start = Instant::now();
    let result = model.fit_with_options(&x_train, &y_train, &params, opts)?;
    println!(
        "Trained {} epochs in {:.1?} ({} examples skipped)",
        result.epochs_run,
        start.elapsed(),
        result.skipped
    );

    let after = model.accuracy(&x_test, &y_test);
    println!("Test accuracy after training:  {:.2}%", after * 100.0);

    let mut votes = vec![0; model.n_class()];
    let class = model.evaluate_into(&x_test[0], &mut votes)?;
    println!("First test image: votes {votes:?} -> class {class} (label {})", y_test[0]);

    Ok(())
}
