use crate::config::{FenceStyle, PathStyle};
use crate::models::Coordinate;

/// Drawing operations the tracker needs from a slippy map.
pub trait MapSurface {
    fn set_view(&mut self, center: Coordinate, zoom: u8);
    fn draw_fence(&mut self, ring: &[Coordinate], style: &FenceStyle);
    fn set_fence_style(&mut self, style: &FenceStyle);
    fn draw_path(&mut self, style: &PathStyle);
    fn place_marker(&mut self, at: Coordinate);
    fn move_marker(&mut self, at: Coordinate);
    fn extend_path(&mut self, at: Coordinate);
}

/// Owns the map surface plus the marker and path state laid over it.
pub struct MapView<S: MapSurface> {
    surface: S,
    fix_zoom: u8,
    marker_placed: bool,
    fence_drawn: bool,
    path: Vec<Coordinate>,
}

impl<S: MapSurface> MapView<S> {
    pub fn new(surface: S, fix_zoom: u8) -> Self {
        Self {
            surface,
            fix_zoom,
            marker_placed: false,
            fence_drawn: false,
            path: Vec::new(),
        }
    }

    pub fn initialize(&mut self, center: Coordinate, zoom: u8) {
        self.surface.set_view(center, zoom);
    }

    // Drawn once; later changes go through restyle_geofence
    pub fn draw_geofence(&mut self, ring: &[Coordinate], style: &FenceStyle) {
        if self.fence_drawn {
            log::debug!("Geofence already drawn, ignoring redraw");
            return;
        }
        self.surface.draw_fence(ring, style);
        self.fence_drawn = true;
    }

    // Added after the fence so the track draws on top of its fill
    pub fn draw_path(&mut self, style: &PathStyle) {
        self.surface.draw_path(style);
    }

    pub fn restyle_geofence(&mut self, style: &FenceStyle) {
        self.surface.set_fence_style(style);
    }

    /// The first fix creates the marker and zooms in on it; later fixes only
    /// move it.
    pub fn update_user_position(&mut self, at: Coordinate) {
        if self.marker_placed {
            self.surface.move_marker(at);
        } else {
            self.surface.place_marker(at);
            self.surface.set_view(at, self.fix_zoom);
            self.marker_placed = true;
        }
    }

    pub fn append_path_point(&mut self, at: Coordinate) {
        self.path.push(at);
        self.surface.extend_path(at);
    }

    pub fn has_marker(&self) -> bool {
        self.marker_placed
    }

    pub fn path(&self) -> &[Coordinate] {
        &self.path
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}
