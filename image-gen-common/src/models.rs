//! Known Together AI image models.
//!
//! The upstream API is authoritative on which models exist; this table only
//! feeds the `image://models` resource so clients can pick a sensible name.

/// Image model definition.
#[derive(Debug, Clone, Copy)]
pub struct ImageModel {
    /// Full model identifier as sent in the request body
    pub id: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
    /// Default number of inference steps the API applies
    pub default_steps: u8,
}

/// FLUX.1 [schnell], the fallback model.
pub const FLUX_1_SCHNELL: ImageModel = ImageModel {
    id: "black-forest-labs/FLUX.1-schnell",
    display_name: "FLUX.1 [schnell]",
    default_steps: 4,
};

/// FLUX.1 [schnell] free tier.
pub const FLUX_1_SCHNELL_FREE: ImageModel = ImageModel {
    id: "black-forest-labs/FLUX.1-schnell-Free",
    display_name: "FLUX.1 [schnell] Free",
    default_steps: 4,
};

/// FLUX.1 [dev].
pub const FLUX_1_DEV: ImageModel = ImageModel {
    id: "black-forest-labs/FLUX.1-dev",
    display_name: "FLUX.1 [dev]",
    default_steps: 28,
};

/// FLUX.1 [pro].
pub const FLUX_1_PRO: ImageModel = ImageModel {
    id: "black-forest-labs/FLUX.1-pro",
    display_name: "FLUX.1 [pro]",
    default_steps: 28,
};

/// FLUX1.1 [pro].
pub const FLUX_1_1_PRO: ImageModel = ImageModel {
    id: "black-forest-labs/FLUX.1.1-pro",
    display_name: "FLUX1.1 [pro]",
    default_steps: 28,
};

/// All known image models
pub const IMAGE_MODELS: &[ImageModel] = &[
    FLUX_1_SCHNELL,
    FLUX_1_SCHNELL_FREE,
    FLUX_1_DEV,
    FLUX_1_PRO,
    FLUX_1_1_PRO,
];
