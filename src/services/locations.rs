//! Location hierarchy adapter.
//!
//! The remote API does not reliably filter floors, rooms and faculties by
//! parent, so full lists are fetched and narrowed here.

use super::{endpoints, gateway::GatewayClient};
use crate::{
    error::AppResult,
    models::{Building, Faculty, Floor, Room, University},
};

#[derive(Clone)]
pub struct LocationService {
    gateway: GatewayClient,
}

impl LocationService {
    pub fn new(gateway: GatewayClient) -> Self {
        Self { gateway }
    }

    pub async fn university(&self) -> AppResult<Vec<University>> {
        self.gateway.get_json(endpoints::UNIVERSITY).await
    }

    pub async fn buildings(&self) -> AppResult<Vec<Building>> {
        self.gateway.get_json(endpoints::BUILDINGS).await
    }

    pub async fn floors(&self, building_id: i64) -> AppResult<Vec<Floor>> {
        let floors: Vec<Floor> = self.gateway.get_json(endpoints::FLOORS).await?;
        Ok(floors_in(floors, building_id))
    }

    pub async fn rooms(&self, building_id: i64, floor_id: i64) -> AppResult<Vec<Room>> {
        let rooms: Vec<Room> = self.gateway.get_json(endpoints::ROOMS).await?;
        Ok(rooms_on(rooms, building_id, floor_id))
    }

    pub async fn faculties(&self, building_id: i64, floor_id: i64) -> AppResult<Vec<Faculty>> {
        let faculties: Vec<Faculty> = self.gateway.get_json(endpoints::FACULTIES).await?;
        Ok(faculties_on(faculties, building_id, floor_id))
    }
}

pub fn floors_in(floors: Vec<Floor>, building_id: i64) -> Vec<Floor> {
    let mut floors: Vec<Floor> = floors.into_iter().filter(|f| f.building == building_id).collect();
    floors.sort_by_key(|f| f.number);
    floors
}

pub fn rooms_on(rooms: Vec<Room>, building_id: i64, floor_id: i64) -> Vec<Room> {
    rooms
        .into_iter()
        .filter(|r| r.building == building_id && r.floor == floor_id)
        .collect()
}

pub fn faculties_on(faculties: Vec<Faculty>, building_id: i64, floor_id: i64) -> Vec<Faculty> {
    faculties
        .into_iter()
        .filter(|f| f.building == building_id && f.floor == floor_id)
        .collect()
}
