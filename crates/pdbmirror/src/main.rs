mod cli;

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pdbmirror_fetch::{MirrorTree, ReqwestTransport, RetrieveOptions, Retriever};
use pdbmirror_probe::MirrorSelector;
use pdbmirror_source::{
    FileFormat, FormatKey, Protocol, Server, ServerRegistry, parse_server_address,
};

use cli::{App, Command};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app = App::parse();
    let registry = ServerRegistry::builtin();

    let key = FormatKey::parse(&app.format).ok_or_else(|| {
        anyhow!(
            "unknown format '{}' (expected one of: {})",
            app.format,
            FormatKey::ALL.map(FormatKey::cli_name).join(", ")
        )
    })?;
    let format = key.format();

    let explicit_protocol = app
        .protocol
        .as_deref()
        .map(Protocol::from_name)
        .transpose()?;
    let (server, protocol) =
        resolve_mirror(&registry, format, app.server.as_deref(), explicit_protocol).await?;
    if protocol == Protocol::Ftp {
        bail!("the bundled transport serves HTTPS only; pass --protocol https");
    }
    info!(server = %server, %protocol, "using mirror");

    let root = match app.root.clone() {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let tree = MirrorTree::new(root).flat(app.flat);
    let retriever = Retriever::new(ReqwestTransport::new(), tree);

    let options = RetrieveOptions::default()
        .compressed(format.has_compressed())
        .overwrite(app.overwrite);

    match app.cmd {
        Command::Get(args) => {
            let options = options.obsolete(args.obsolete);
            let paths = retriever
                .retrieve_many(&server, protocol, format, &args.codes, &options)
                .await;
            for path in &paths {
                println!("{}", path.display());
            }

            if args.with_assemblies {
                let assembly_key = key
                    .assembly_variant()
                    .ok_or_else(|| anyhow!("format {} has no assembly variant", key.cli_name()))?;
                let assembly_format = assembly_key.format();
                let options = RetrieveOptions::default()
                    .compressed(assembly_format.has_compressed())
                    .overwrite(app.overwrite);
                for code in &args.codes {
                    for path in retriever
                        .retrieve_assemblies(&server, protocol, assembly_format, code, &options)
                        .await
                    {
                        println!("{}", path.display());
                    }
                }
            }
        }
        Command::Assemblies(args) => {
            let assembly_key = key
                .assembly_variant()
                .ok_or_else(|| anyhow!("format {} has no assembly variant", key.cli_name()))?;
            let assembly_format = assembly_key.format();
            let options = RetrieveOptions::default()
                .compressed(assembly_format.has_compressed())
                .overwrite(app.overwrite);
            let paths = retriever
                .retrieve_assemblies(&server, protocol, assembly_format, &args.code, &options)
                .await;
            for path in &paths {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

/// Pick the mirror and protocol: an explicit `--server` (registry id or
/// legacy string address) wins, otherwise the fastest reachable mirror
/// eligible for the format is probed.
async fn resolve_mirror(
    registry: &ServerRegistry,
    format: &FileFormat,
    server_arg: Option<&str>,
    explicit_protocol: Option<Protocol>,
) -> Result<(Server, Protocol)> {
    let mut protocol = explicit_protocol.unwrap_or_else(|| registry.default_protocol());
    if explicit_protocol.is_none() && !format.allows_protocol(protocol) {
        protocol = format.allowed_protocols()[0];
    }

    if let Some(arg) = server_arg {
        if let Some(server) = registry.get(&arg.to_ascii_uppercase()) {
            return Ok((server.clone(), protocol));
        }
        if arg.contains("://") {
            let (server, legacy_protocol) = parse_server_address(arg, registry)?;
            return Ok((server, explicit_protocol.unwrap_or(legacy_protocol)));
        }
        bail!("unknown server '{arg}' (expected a registry id or a URL-style address)");
    }

    let candidates = registry.candidates(format);
    let selector = MirrorSelector::new();
    let server = selector.fastest(protocol, &candidates).await?;
    Ok((server, protocol))
}
