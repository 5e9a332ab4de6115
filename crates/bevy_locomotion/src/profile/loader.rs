use super::LocomotionProfile;
use crate::errors::AssetLoaderError;
use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    reflect::TypePath,
};

#[derive(Default, TypePath)]
pub struct LocomotionProfileLoader;

impl AssetLoader for LocomotionProfileLoader {
    type Asset = LocomotionProfile;
    type Settings = ();
    type Error = AssetLoaderError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = vec![];
        reader.read_to_end(&mut bytes).await?;
        let profile: LocomotionProfile = ron::de::from_bytes(&bytes)?;
        profile.validate()?;

        Ok(profile)
    }

    fn extensions(&self) -> &[&str] {
        &["locomotion.ron"]
    }
}
