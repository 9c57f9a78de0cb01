//! Provisioning pipeline
//!
//! The steps run strictly in order and the first failure aborts the run:
//! 1. Resolve the jfrog home
//! 2. Download the release archive
//! 3. Install it and apply platform fixes
//! 4. Write license and first-boot configuration
//! 5. Launch the server
//! 6. Wait for the health endpoint
//! 7. Mint and export an admin token (modern layout)
//! 8. Set the custom base URL and enable archive indexing
//!
//! A failed run leaves whatever it already wrote on disk; the next run is
//! refused by the home check until the directory is cleaned up.

use tracing::info;

use crate::configure;
use crate::credential;
use crate::environment::EnvironmentSink;
use crate::error::Result;
use crate::fetch;
use crate::home;
use crate::installer;
use crate::launcher;
use crate::layout::ServerLayout;
use crate::patcher;
use crate::readiness;
use crate::retry::Pause;
use crate::server::ServerApi;
use crate::settings::Settings;

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub layout: ServerLayout,
    pub archive_url: String,
    /// Whether an admin token was minted and handed to the export step
    pub token_minted: bool,
}

/// Runs the provisioning steps against one server
pub struct Provisioner<'a> {
    settings: &'a Settings,
    api: &'a dyn ServerApi,
    pause: &'a dyn Pause,
    env: &'a mut dyn EnvironmentSink,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        settings: &'a Settings,
        api: &'a dyn ServerApi,
        pause: &'a dyn Pause,
        env: &'a mut dyn EnvironmentSink,
    ) -> Self {
        Self {
            settings,
            api,
            pause,
            env,
        }
    }

    /// Run every step once
    pub fn run(&mut self) -> Result<ProvisionReport> {
        let settings = self.settings;

        let resolved = home::resolve(settings.home_override.as_deref())?;
        if resolved.derived {
            self.env.export_home(&resolved.path);
        }
        let layout = ServerLayout::new(resolved.path, settings.is_legacy());
        info!(
            version = %settings.version,
            os = %settings.host_os,
            legacy = layout.is_legacy(),
            "Provisioning Artifactory into {}",
            layout.home().display()
        );

        let url = fetch::archive_url(
            &settings.endpoints.releases,
            &settings.version,
            settings.host_os,
            layout.is_legacy(),
        );
        // The download client and its runtime thread are gone after this statement.
        let archive = fetch::download(&fetch::download_client()?, &url, layout.home())?;

        installer::install(&archive, &layout, settings.host_os)?;
        patcher::patch(&layout, &settings.license, self.env)?;
        launcher::start(&layout, settings.host_os)?;

        readiness::wait_until_ready(self.api, &settings.polling, self.pause)?;

        let token_minted = match layout.modern() {
            Some(modern) => {
                let token = credential::mint(
                    self.api,
                    &settings.polling,
                    self.pause,
                    &modern.generated_token,
                )?;
                credential::export(settings.export_file.as_deref(), &token)?;
                true
            }
            None => false,
        };

        configure::set_custom_base_url(self.api, &settings.endpoints.artifactory)?;
        if !layout.is_legacy() {
            configure::enable_archive_index(self.api)?;
        }

        info!("Artifactory is ready at {}", settings.endpoints.artifactory);
        Ok(ProvisionReport {
            layout,
            archive_url: archive.source_url,
            token_minted,
        })
    }
}
