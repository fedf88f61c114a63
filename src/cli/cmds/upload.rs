use anyhow::Context;

use crate::base;
use crate::cli;

/// Extract a receipt from an image and store it
///
/// The image is sent to the configured extraction model. The resulting
/// receipt is stored as pending, ready to be checked with 'edit'.
#[derive(clap::Parser)]
pub struct Upload {
    /// Path to the receipt image
    image: std::path::PathBuf,

    /// Content type of the image [default: guessed from the file extension,
    /// otherwise image/jpeg]
    #[arg(long, value_name = "TYPE")]
    mime: Option<String>,
}

impl Upload {
    fn read_image(&self) -> anyhow::Result<base::Image> {
        let image = base::Image::from_file(&self.image)
            .with_context(|| format!("failed to read image '{}'", self.image.display()))?;
        Ok(match &self.mime {
            Some(m) => image.with_mime_type(m),
            None => image,
        })
    }

    pub async fn run(
        &self,
        config: &base::Config,
        gateway: &dyn base::Gateway,
    ) -> anyhow::Result<cli::Output> {
        let image = self.read_image()?;
        let api_key = cli::util::secret(&config.extractor.api_key_env)?;
        let extractor = base::GeminiExtractor::new(&config.extractor, api_key);
        self.run_with(image, &extractor, gateway, config.use_colored_output)
            .await
    }

    async fn run_with(
        &self,
        image: base::Image,
        extractor: &dyn base::Extractor,
        gateway: &dyn base::Gateway,
        colored: bool,
    ) -> anyhow::Result<cli::Output> {
        let mut slot = base::Upload::new();
        slot.select(image)?;
        let ingested = slot
            .submit(extractor, gateway)
            .await
            .with_context(|| format!("upload of '{}' failed", self.image.display()))?
            .context("no image selected")?;

        let id = ingested.record.id();
        let rl = ingested.refresh.refetch(gateway).await?;
        let record = rl.get(id).unwrap_or(&ingested.record);
        Ok(cli::Output::Listing {
            table: cli::util::receipt_table(&[record], colored),
            footer: Some(format!("Stored receipt {} as pending.", id)),
        })
    }
}
