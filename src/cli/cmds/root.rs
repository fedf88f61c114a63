use anyhow::Context;

use crate::base;
use crate::cli;

/// Receipt and invoice manager
#[derive(clap::Parser)]
#[command(color = clap::ColorChoice::Never)]
pub struct Root {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    Init(cli::cmds::init::Init),
    Upload(cli::cmds::upload::Upload),
    Ls(cli::cmds::ls::Ls),
    Edit(cli::cmds::edit::Edit),
    Assign(cli::cmds::assign::Assign),
    Status(cli::cmds::status::SetStatus),
    Stats(cli::cmds::stats::Stats),
    Export(cli::cmds::export::Export),
    Cats(cli::cmds::cats::Cats),
}

impl Root {
    pub async fn run(self, fs: &base::Fs) -> anyhow::Result<cli::Output> {
        if let Commands::Init(cmd) = self.command {
            return cmd.run(fs);
        }

        if !fs.is_repo() {
            anyhow::bail!("not a repository")
        }
        let config = fs
            .read::<base::Config>()
            .with_context(|| format!("failed to read '{}'", fs.path::<base::Config>().display()))?;
        let gateway = cli::util::gateway(&config, fs)?;
        let gateway = gateway.as_ref();
        tracing::debug!(store = gateway.backend_tag(), "record store ready");

        match self.command {
            Commands::Init(_) => unreachable!(),
            Commands::Upload(cmd) => cmd.run(&config, gateway).await,
            Commands::Ls(cmd) => cmd.run(&cli::util::fetch(gateway).await?, &config),
            Commands::Edit(cmd) => {
                let rl = cli::util::fetch(gateway).await?;
                cmd.run(&rl, &config, gateway).await
            }
            Commands::Assign(cmd) => cmd.run(gateway).await,
            Commands::Status(cmd) => cmd.run(gateway).await,
            Commands::Stats(cmd) => cmd.run(&cli::util::fetch(gateway).await?),
            Commands::Export(cmd) => cmd.run(&cli::util::fetch(gateway).await?),
            Commands::Cats(cmd) => cmd.run(&cli::util::fetch(gateway).await?),
        }
    }
}
