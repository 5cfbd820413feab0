use silicon_policy::PrimaryDisplay;

/// Values from the setup-variable store.
///
/// `None` keeps the silicon default (or the board's value); the store's
/// persistence format is not this crate's concern.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SetupOptions {
    // CPU
    pub hyper_threading: Option<bool>,
    /// Cores to enable; 0 for all.
    pub active_cores: Option<u8>,
    pub vmx: Option<bool>,
    pub txt: Option<bool>,
    pub turbo: Option<bool>,
    pub package_c_state_limit: Option<u8>,
    pub tcc_activation_offset: Option<u8>,

    // Memory
    pub max_memory_frequency_mts: Option<u16>,
    pub ecc: Option<bool>,
    pub memory_fast_boot: Option<bool>,
    pub igd_stolen_size_mb: Option<u16>,

    // Chipset
    /// Ports to switch off, bit `n` for port `n`.
    pub usb_port_disable_mask: Option<u16>,
    pub hd_audio: Option<bool>,
    pub audio_dsp: Option<bool>,

    // Graphics
    pub igd: Option<bool>,
    pub primary_display: Option<PrimaryDisplay>,
    pub aperture_size_mb: Option<u16>,
}
