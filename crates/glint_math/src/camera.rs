//! Pinhole camera for primary ray generation.

use crate::{DVec3, Ray};

/// Pinhole camera that maps (fractional) pixel coordinates to world rays.
///
/// The projection plane sits `proj_dist` in front of the eye and is
/// `proj_size` wide along its shorter side; the longer side follows the
/// frame aspect ratio.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    // Image settings
    pub frame_width: u32,
    pub frame_height: u32,

    // Camera positioning
    location: DVec3,
    look_at: DVec3,
    vup: DVec3,

    // Projection settings
    proj_size: f64,
    proj_dist: f64,

    // Cached values (recomputed on every change)
    dir: DVec3,
    right: DVec3,
    up: DVec3,
    proj_w: f64,
    proj_h: f64,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        let mut camera = Self {
            frame_width: 800,
            frame_height: 600,
            location: DVec3::splat(3.0),
            look_at: DVec3::ZERO,
            vup: DVec3::Y,
            proj_size: 0.1,
            proj_dist: 0.1,
            dir: DVec3::NEG_Z,
            right: DVec3::X,
            up: DVec3::Y,
            proj_w: 0.1,
            proj_h: 0.1,
        };
        camera.update();
        camera
    }

    /// Set frame resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.resize(width, height);
        self
    }

    /// Set camera location, target and approximate up direction.
    pub fn with_position(mut self, location: DVec3, look_at: DVec3, vup: DVec3) -> Self {
        self.set_position(location, look_at, vup);
        self
    }

    /// Set projection plane size and distance.
    pub fn with_projection(mut self, proj_size: f64, proj_dist: f64) -> Self {
        self.proj_size = proj_size;
        self.proj_dist = proj_dist;
        self.update();
        self
    }

    /// Move the camera.
    pub fn set_position(&mut self, location: DVec3, look_at: DVec3, vup: DVec3) {
        self.location = location;
        self.look_at = look_at;
        self.vup = vup;
        self.update();
    }

    /// Change frame resolution (keeps the projection plane aspect in sync).
    pub fn resize(&mut self, width: u32, height: u32) {
        self.frame_width = width.max(1);
        self.frame_height = height.max(1);
        self.update();
    }

    /// Camera location.
    pub fn location(&self) -> DVec3 {
        self.location
    }

    /// Unit viewing direction.
    pub fn direction(&self) -> DVec3 {
        self.dir
    }

    fn update(&mut self) {
        self.dir = (self.look_at - self.location).normalize_or(DVec3::NEG_Z);
        self.right = self.dir.cross(self.vup).normalize_or(DVec3::X);
        self.up = self.right.cross(self.dir);

        let (w, h) = (self.frame_width as f64, self.frame_height as f64);
        self.proj_w = self.proj_size;
        self.proj_h = self.proj_size;
        if w > h {
            self.proj_w *= w / h;
        } else {
            self.proj_h *= h / w;
        }
    }

    /// Generate the ray through frame position (xs, ys).
    ///
    /// Integer coordinates address the pixel's top-left sub-sample; the ray
    /// passes half a pixel further, so (x + 0.5, y + 0.5) style offsets
    /// spread sub-samples inside the pixel.
    pub fn frame_ray(&self, xs: f64, ys: f64) -> Ray {
        let (w, h) = (self.frame_width as f64, self.frame_height as f64);

        let a = self.dir * self.proj_dist;
        let b = self.right * ((xs + 0.5 - w / 2.0) / w * self.proj_w);
        let c = self.up * ((-(ys + 0.5) + h / 2.0) / h * self.proj_h);
        let x = a + b + c;

        Ray::new(self.location + x, x.normalize())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
