// Fbswap CLI
// Listens for Ctrl+Alt+[digit] and switches framebuffer views

#![cfg_attr(not(feature = "runtime"), allow(unused_imports))]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(feature = "runtime")]
use clap::Parser;

#[cfg(feature = "runtime")]
use fbswap_core::config::parser::default_config_content;
#[cfg(feature = "runtime")]
use fbswap_core::{Config, EventLoop, Framebuffer, Listener, LogSwitcher, ViewSwitcher};

/// Switch between framebuffer views with Ctrl+Alt+[0-9]
#[cfg(feature = "runtime")]
#[derive(Parser, Debug)]
#[command(name = "fbswap")]
#[command(author = "fbswap contributors")]
#[command(version)]
#[command(about = "Switch between framebuffer views with Ctrl+Alt+[0-9]", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Manually specify keyboard devices (can be used multiple times)
    #[arg(short, long, value_name = "DEVICE")]
    devices: Vec<String>,

    /// Framebuffer device to switch
    #[arg(short, long, value_name = "PATH")]
    framebuffer: Option<PathBuf>,

    /// Grab keyboard devices so other readers do not see their events
    #[arg(long)]
    grab: bool,

    /// Log view switches instead of touching the framebuffer
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Validate config and exit
    #[arg(long)]
    check_config: bool,

    /// List available keyboard devices
    #[arg(long)]
    list_devices: bool,

    /// Print an example config file and exit
    #[arg(long)]
    print_config: bool,
}

/// Main application state
#[cfg(feature = "runtime")]
struct Application {
    config: Config,
    args: Args,
    /// Flag to signal the listener to stop
    running: Arc<AtomicBool>,
}

/// Merge CLI flags over the loaded config
#[cfg(feature = "runtime")]
fn apply_overrides(mut config: Config, args: &Args) -> Config {
    if !args.devices.is_empty() {
        config.device_filter = args.devices.clone();
    }
    if let Some(ref framebuffer) = args.framebuffer {
        config.framebuffer = framebuffer.clone();
    }
    if args.grab {
        config.grab = true;
    }
    config
}

#[cfg(feature = "runtime")]
impl Application {
    /// Create a new application from CLI arguments
    fn new(args: Args) -> Result<Self, Box<dyn std::error::Error>> {
        let config = match args.config {
            Some(ref path) => Config::from_toml_path(path)?,
            None => Config::load_default()?,
        };

        Ok(Self {
            config: apply_overrides(config, &args),
            args,
            running: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Validate configuration
    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        println!("Configuration is valid");
        println!("  framebuffer: {}", self.config.framebuffer.display());
        if self.config.device_filter.is_empty() {
            println!("  devices: all keyboards");
        } else {
            println!("  devices: {:?}", self.config.device_filter);
        }
        println!("  grab: {}", self.config.grab);
        println!("  poll timeout: {}ms", self.config.poll_timeout_ms);
        Ok(())
    }

    /// List available keyboard devices
    fn list_devices() -> Result<(), Box<dyn std::error::Error>> {
        match EventLoop::list_devices() {
            Ok(devices) => {
                println!("Found {} keyboard device(s):", devices.len());
                for device in &devices {
                    match &device.path {
                        Some(path) => println!("  {}: {} ({})", device.index, device.name, path),
                        None => println!("  {}: {}", device.index, device.name),
                    }
                }
                Ok(())
            }
            Err(e) => {
                eprintln!("Error finding keyboard devices: {}", e);
                Err(e.into())
            }
        }
    }

    /// Open the framebuffer (unless dry-running) and listen
    fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.install_signal_handler();

        if self.args.dry_run {
            log::info!("dry run, framebuffer will not be touched");
            return self.listen(LogSwitcher);
        }

        let framebuffer = Arc::new(Framebuffer::open(&self.config.framebuffer)?);
        self.listen(Arc::clone(&framebuffer))?;
        // The listener has unsubscribed by now; the device closes on drop.
        log::info!("releasing {}", framebuffer.path().display());
        Ok(())
    }

    fn listen<S>(&self, switcher: S) -> Result<(), Box<dyn std::error::Error>>
    where
        S: ViewSwitcher,
    {
        let notifier = EventLoop::new(self.config.device_filter.clone(), self.config.grab);
        let mut listener = Listener::start(notifier, switcher)?;

        log::debug!(
            "listening on {} device(s): {:?}",
            listener.notifier().device_count(),
            listener.notifier().device_names()
        );
        println!("fbswap is running. Press Ctrl+C to exit.");

        let result = listener.run(&self.running, self.config.poll_timeout_ms);

        // Stop even when the loop failed, so devices are released
        listener.stop()?;
        result.map_err(Into::into)
    }

    /// Stop the listener on SIGINT/SIGTERM
    fn install_signal_handler(&self) {
        use signal_hook::consts::{SIGINT, SIGTERM};
        use signal_hook::iterator::Signals;

        let running = self.running.clone();
        match Signals::new([SIGINT, SIGTERM]) {
            Ok(mut signals) => {
                std::thread::spawn(move || {
                    if let Some(signal) = signals.forever().next() {
                        log::info!("received signal {}, shutting down", signal);
                        running.store(false, Ordering::SeqCst);
                    }
                });
            }
            Err(e) => log::warn!("could not install signal handler: {}", e),
        }
    }
}

#[cfg(feature = "runtime")]
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

#[cfg(feature = "runtime")]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    // Handle flags that do not require a config
    if args.print_config {
        print!("{}", default_config_content());
        return Ok(());
    }
    if args.list_devices {
        return Application::list_devices();
    }

    let app = Application::new(args)?;

    if app.args.check_config {
        return app.validate();
    }

    app.run()
}

// Stub for when the runtime feature is not enabled
#[cfg(not(feature = "runtime"))]
fn main() {
    eprintln!("Error: fbswap binary requires the 'runtime' feature to be enabled.");
    eprintln!("Please build with: cargo build --release --features runtime --bin fbswap");
    std::process::exit(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(feature = "runtime")]
    fn test_args_parsing() {
        let args = Args::parse_from(["fbswap", "--config", "/tmp/test.toml"]);

        assert_eq!(args.config, Some(PathBuf::from("/tmp/test.toml")));
        assert!(args.devices.is_empty());
        assert!(args.framebuffer.is_none());
        assert!(!args.grab);
        assert!(!args.dry_run);
        assert!(!args.verbose);
        assert!(!args.check_config);
        assert!(!args.list_devices);
    }

    #[test]
    #[cfg(feature = "runtime")]
    fn test_args_with_options() {
        let args = Args::parse_from([
            "fbswap",
            "--framebuffer",
            "/dev/fb1",
            "--verbose",
            "--dry-run",
            "--devices",
            "/dev/input/event0",
            "--devices",
            "/dev/input/event1",
        ]);

        assert_eq!(args.framebuffer, Some(PathBuf::from("/dev/fb1")));
        assert!(args.verbose);
        assert!(args.dry_run);
        assert_eq!(args.devices, vec!["/dev/input/event0", "/dev/input/event1"]);
    }

    #[test]
    #[cfg(feature = "runtime")]
    fn test_args_list_devices() {
        let args = Args::parse_from(["fbswap", "--list-devices"]);
        assert!(args.list_devices);
    }

    #[test]
    #[cfg(feature = "runtime")]
    fn test_cli_overrides_config() {
        let config = Config::from_toml(
            r#"
            [framebuffer]
            device = "/dev/fb0"

            [devices]
            only = ["Config Keyboard"]
            "#,
        )
        .unwrap();
        let args = Args::parse_from([
            "fbswap",
            "--framebuffer",
            "/dev/fb2",
            "--devices",
            "CLI Keyboard",
            "--grab",
        ]);

        let merged = apply_overrides(config, &args);
        assert_eq!(merged.framebuffer, PathBuf::from("/dev/fb2"));
        assert_eq!(merged.device_filter, vec!["CLI Keyboard".to_string()]);
        assert!(merged.grab);
    }

    #[test]
    #[cfg(feature = "runtime")]
    fn test_config_kept_without_overrides() {
        let config = Config::from_toml("[devices]\nonly = [\"Config Keyboard\"]\ngrab = true\n")
            .unwrap();
        let args = Args::parse_from(["fbswap"]);

        let merged = apply_overrides(config.clone(), &args);
        assert_eq!(merged, config);
    }
}
