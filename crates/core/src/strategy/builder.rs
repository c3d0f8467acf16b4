use color_eyre::eyre::{self, Context as _};

use crate::{
    config::{Config, EngineConfig},
    fees::FeeModel,
    strategy::Engine,
};

pub struct Builder {
    pub fees: FeeModel,
    pub config: EngineConfig,
}

impl Builder {
    pub fn from_config(config: &Config) -> eyre::Result<Self> {
        Ok(Self {
            fees: config.fee_model()?,
            config: config.engine_config(),
        })
    }

    pub fn build(self) -> eyre::Result<Engine> {
        let Self { fees, config } = self;

        fees.validate().wrap_err("invalid fee model")?;
        config.validate().wrap_err("invalid engine config")?;

        Ok(Engine { fees, config })
    }
}
