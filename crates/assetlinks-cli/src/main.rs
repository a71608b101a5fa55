//! assetlinks CLI: `assetlinks` command.
//!
//! Inspects Digital Asset Links statement lists: derive well-known URIs,
//! list or check statements, and verify app packages against an origin.
//!
//! Exit status is 0 when the requested relationship holds (or the command
//! only reports), 2 when it was checked and does not hold, and 1 on error.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use assetlinks::grammar::parse_source_origin;
use assetlinks::{
    check_statement, list_statements, well_known_uri, AppPackageVerifier, Asset, Fingerprint,
    PrincipalFingerprints, SourceVerifier, StaticSigningInfo, TransportConfig,
};

// ── CLI structure ─────────────────────────────────────────────────────────────

/// assetlinks: verify Digital Asset Links relationships.
#[derive(Parser, Debug)]
#[command(
    name = "assetlinks",
    about = "Digital Asset Links CLI",
    version,
    long_about = "assetlinks: Digital Asset Links CLI\n\nFetch an origin's /.well-known/assetlinks.json statement tree,\nlist or check its statements, and verify app packages against it."
)]
struct Cli {
    /// Connect and read timeout per document, in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the well-known statement list URI for an origin
    WellKnown {
        /// http or https origin
        origin: String,
    },

    /// List the statements an origin publishes
    List {
        /// http or https origin (no path, query, or fragment)
        origin: String,

        /// Only list statements with this relation
        #[arg(long)]
        relation: Option<String>,

        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Check whether an origin asserts a relation towards a target
    Check {
        /// http or https origin (no path, query, or fragment)
        origin: String,

        /// Relation, e.g. delegate_permission/common.handle_all_urls
        #[arg(long)]
        relation: String,

        /// Web target site
        #[arg(long, conflicts_with_all = ["package", "fingerprint"])]
        site: Option<String>,

        /// Android app target package name
        #[arg(long, requires = "fingerprint")]
        package: Option<String>,

        /// Android app target SHA-256 certificate fingerprint
        #[arg(long, requires = "package")]
        fingerprint: Option<String>,
    },

    /// Verify that an origin vouches for an Android app package
    VerifyApp {
        /// http or https origin
        origin: String,

        /// App package name
        #[arg(long)]
        package: String,

        /// DER-encoded signing certificate (repeatable)
        #[arg(long, conflicts_with = "fingerprint")]
        cert: Vec<PathBuf>,

        /// SHA-256 signing certificate fingerprint (repeatable)
        #[arg(long)]
        fingerprint: Vec<String>,

        /// Treat each certificate as an independent signer; all must be vouched for
        #[arg(long)]
        multiple_signers: bool,
    },
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn transport_config(timeout_ms: Option<u64>, default: TransportConfig) -> TransportConfig {
    timeout_ms
        .map(|ms| TransportConfig::with_timeout(Duration::from_millis(ms)))
        .unwrap_or(default)
}

fn report(established: bool, yes: &str, no: &str) -> bool {
    println!("{}", if established { yes } else { no });
    established
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn cmd_well_known(origin: &str) -> Result<bool> {
    let origin = parse_source_origin(origin)?;
    println!("{}", well_known_uri(&origin)?);
    Ok(true)
}

fn cmd_list(
    origin: &str,
    relation: Option<&str>,
    json: bool,
    timeout_ms: Option<u64>,
    verbose: bool,
) -> Result<bool> {
    let verifier = SourceVerifier::with_http(transport_config(timeout_ms, TransportConfig::default()));
    let listing = list_statements(&verifier, origin, relation)
        .with_context(|| format!("failed to list statements for {origin}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(true);
    }

    for statement in &listing.statements {
        println!("{}  {}", statement.relation, statement.target);
    }
    println!(
        "{} statement(s) from {} document(s)",
        listing.statements.len(),
        listing.document_count
    );
    if listing.had_warnings {
        println!("Warnings occurred; run with --verbose for details");
    }
    if verbose {
        println!("Verified at: {}", listing.verified_at.to_rfc3339());
    }
    Ok(true)
}

fn cmd_check(
    origin: &str,
    relation: &str,
    target: Asset,
    timeout_ms: Option<u64>,
) -> Result<bool> {
    let verifier = SourceVerifier::with_http(transport_config(timeout_ms, TransportConfig::default()));
    let linked = check_statement(&verifier, origin, relation, &target)
        .with_context(|| format!("failed to check {origin}"))?;
    Ok(report(
        linked,
        &format!("{origin} asserts {relation} -> {target}"),
        &format!("{origin} does not assert {relation} -> {target}"),
    ))
}

fn cmd_verify_app(
    origin: &str,
    package: &str,
    certs: &[PathBuf],
    fingerprints: &[String],
    multiple_signers: bool,
    timeout_ms: Option<u64>,
) -> Result<bool> {
    let signers = if !certs.is_empty() {
        certs
            .iter()
            .map(|path| {
                std::fs::read(path)
                    .map(|der| Fingerprint::of_der_certificate(&der))
                    .with_context(|| format!("failed to read certificate {}", path.display()))
            })
            .collect::<Result<Vec<_>>>()?
    } else if !fingerprints.is_empty() {
        fingerprints
            .iter()
            .map(|fp| Fingerprint::parse(fp).map_err(anyhow::Error::from))
            .collect::<Result<Vec<_>>>()?
    } else {
        return Err(anyhow!("provide at least one --cert or --fingerprint"));
    };

    let principal = if multiple_signers {
        PrincipalFingerprints::MultipleSigners { current: signers }
    } else {
        PrincipalFingerprints::SingleSigner { history: signers }
    };
    let signing = StaticSigningInfo::new().with_package(package, principal);
    let verifier = AppPackageVerifier::new(
        signing,
        SourceVerifier::with_http(transport_config(
            timeout_ms,
            TransportConfig::app_verification(),
        )),
    );

    let verified = verifier
        .verify(package, origin)
        .with_context(|| format!("could not verify {package} against {origin}"))?;
    Ok(report(
        verified,
        &format!("{package} is verified by {origin}"),
        &format!("{package} is NOT verified by {origin}"),
    ))
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    let timeout_ms = cli.timeout_ms;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if verbose { "debug" } else { "warn" }),
    )
    .init();

    let result = match cli.command {
        Commands::WellKnown { origin } => cmd_well_known(&origin),
        Commands::List {
            origin,
            relation,
            json,
        } => cmd_list(&origin, relation.as_deref(), json, timeout_ms, verbose),
        Commands::Check {
            origin,
            relation,
            site,
            package,
            fingerprint,
        } => match (site, package, fingerprint) {
            (Some(site), _, _) => cmd_check(&origin, &relation, Asset::Web { site }, timeout_ms),
            (None, Some(package_name), Some(sha256_fingerprint)) => cmd_check(
                &origin,
                &relation,
                Asset::AndroidApp {
                    package_name,
                    sha256_fingerprint,
                },
                timeout_ms,
            ),
            _ => Err(anyhow!("provide --site, or --package with --fingerprint")),
        },
        Commands::VerifyApp {
            origin,
            package,
            cert,
            fingerprint,
            multiple_signers,
        } => cmd_verify_app(
            &origin,
            &package,
            &cert,
            &fingerprint,
            multiple_signers,
            timeout_ms,
        ),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
