// Jeedom equipment endpoints
//
// `eqLogic::all` returns every equipment known to the controller, whatever
// plugin owns it. Filtering happens in the engine.

use serde_json::Map;
use tracing::debug;

use crate::error::Error;
use crate::jeedom::client::JeedomClient;
use crate::jeedom::models::Equipment;

impl JeedomClient {
    /// List every equipment.
    ///
    /// `eqLogic::all`
    pub async fn list_equipment(&self) -> Result<Vec<Equipment>, Error> {
        debug!("listing equipment");
        self.call("eqLogic::all", Map::new()).await
    }
}
