//! Parallel row scheduler.
//!
//! A fixed pool of workers shares one atomic row cursor: each worker claims
//! the next unclaimed row, renders every pixel in it with a regular
//! supersampling grid, and goes back for more until the frame is exhausted.
//! Rows are disjoint slices of the frame buffer, so no pixel is written by
//! more than one worker.

use crate::control::RenderControl;
use crate::framebuffer::{to_rgb, FrameBuffer};
use crate::scene::Scene;
use crate::shading::Tracer;
use glint_math::{Camera, Color};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that prevent a render pass from starting.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("frame is {frame_width}x{frame_height} but camera expects {camera_width}x{camera_height}")]
    FrameSizeMismatch {
        frame_width: u32,
        frame_height: u32,
        camera_width: u32,
        camera_height: u32,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("a render is already active on this control")]
    AlreadyActive,
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Render on a single worker for reproducible debugging
    pub debug: bool,
    /// Worker count override, ignored in debug mode
    pub threads: Option<usize>,
    /// Edge of the per-pixel sample grid
    pub supersample: u32,
    /// Contribution weight of primary rays
    pub initial_weight: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            debug: false,
            threads: None,
            supersample: 2,
            initial_weight: 0.1,
        }
    }
}

impl RenderConfig {
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_supersample(mut self, supersample: u32) -> Self {
        self.supersample = supersample;
        self
    }

    /// Number of workers a render will use.
    pub fn worker_count(&self) -> usize {
        if self.debug {
            return 1;
        }
        self.threads
            .filter(|&n| n > 0)
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(1)
            })
    }
}

/// Summary of a finished render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStats {
    pub rows: usize,
    pub threads: usize,
    pub elapsed: Duration,
    /// A stop was requested while rendering
    pub cancelled: bool,
}

/// Colour of one pixel: the average of a `grid`×`grid` block of sub-samples.
pub fn render_pixel(
    tracer: &Tracer,
    scene: &Scene,
    camera: &Camera,
    x: u32,
    y: u32,
    config: &RenderConfig,
) -> Color {
    let grid = config.supersample.max(1);
    let step = 1.0 / grid as f64;

    let mut color = Color::ZERO;
    for i in 0..grid {
        for j in 0..grid {
            let ray = camera.frame_ray(x as f64 + j as f64 * step, y as f64 + i as f64 * step);
            color += tracer.trace(&ray, &scene.air, config.initial_weight, 0);
        }
    }
    color / (grid * grid) as f64
}

/// Render `scene` into `frame`.
///
/// Blocks until every worker has finished. A stop requested through
/// `control` makes the remaining rows come out as background.
pub fn render(
    scene: &Scene,
    camera: &Camera,
    frame: &mut FrameBuffer,
    control: &RenderControl,
    config: &RenderConfig,
) -> RenderResult<RenderStats> {
    if frame.width() != camera.frame_width || frame.height() != camera.frame_height {
        return Err(RenderError::FrameSizeMismatch {
            frame_width: frame.width(),
            frame_height: frame.height(),
            camera_width: camera.frame_width,
            camera_height: camera.frame_height,
        });
    }

    let threads = config.worker_count();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;

    let active = control.begin().ok_or(RenderError::AlreadyActive)?;

    log::info!(
        "Rendering {}x{} with {} worker(s), {}x{} samples per pixel",
        frame.width(),
        frame.height(),
        threads,
        config.supersample,
        config.supersample
    );
    let start = Instant::now();

    let width = frame.width();
    let rows: Vec<Mutex<&mut [u32]>> = frame.rows_mut().map(Mutex::new).collect();
    let finished = AtomicUsize::new(0);
    let tracer = Tracer::new(scene, control);

    pool.scope(|s| {
        for worker in 0..threads {
            let rows = &rows;
            let finished = &finished;
            s.spawn(move |_| {
                let mut done = 0;
                loop {
                    let y = control.claim_row();
                    let Some(row) = rows.get(y) else {
                        break;
                    };
                    let mut row = row.lock().unwrap_or_else(PoisonError::into_inner);

                    for x in 0..width {
                        let color = render_pixel(&tracer, scene, camera, x, y as u32, config);
                        row[x as usize] = to_rgb(color);
                    }
                    done += 1;
                }
                finished.fetch_add(done, Ordering::Relaxed);
                log::trace!("Worker {} finished {} rows", worker, done);
            });
        }
    });

    let stats = RenderStats {
        rows: finished.into_inner(),
        threads,
        elapsed: start.elapsed(),
        cancelled: control.is_stop_requested(),
    };
    drop(active);

    log::info!(
        "Rendered {} rows in {:.2?}{}",
        stats.rows,
        stats.elapsed,
        if stats.cancelled { " (cancelled)" } else { "" }
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis_box::AxisBox;
    use crate::hit::HitRecord;
    use crate::light::PointLight;
    use crate::plane::Plane;
    use crate::shape::{Shape, ShapeAttributes, ShapeExt};
    use crate::sphere::Sphere;
    use glint_math::{DVec3, Ray};
    use std::panic::AssertUnwindSafe;

    fn test_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_shape(Plane::new(DVec3::Y, DVec3::new(0.0, -1.0, 0.0)).with_mode(true).boxed());
        scene.add_shape(AxisBox::new(DVec3::new(-1.0, 0.0, 0.0), DVec3::new(-2.0, 1.0, 1.0)).boxed());
        scene.add_shape(Sphere::new(DVec3::new(0.5, 0.0, -0.5), 0.7).boxed());
        scene.add_light(Box::new(
            PointLight::new(DVec3::new(3.5, 5.0, 5.0)).with_falloff(0.7, 0.1, 0.1),
        ));
        scene
    }

    fn camera(width: u32, height: u32) -> Camera {
        Camera::new()
            .with_resolution(width, height)
            .with_position(DVec3::splat(3.0), DVec3::ZERO, DVec3::Y)
    }

    #[test]
    fn test_stop_flag_gives_background() {
        let scene = test_scene();
        let cam = camera(16, 12);
        let mut frame = FrameBuffer::new(16, 12);
        let control = RenderControl::new();
        control.request_stop();

        let stats = render(&scene, &cam, &mut frame, &control, &RenderConfig::default()).unwrap();

        assert!(stats.cancelled);
        let background = to_rgb(scene.background);
        assert!(frame.pixels().iter().all(|&p| p == background));
    }

    #[test]
    fn test_debug_render_is_reproducible() {
        let scene = test_scene();
        let cam = camera(24, 16);
        let control = RenderControl::new();
        let config = RenderConfig::default().with_debug(true);

        let mut first = FrameBuffer::new(24, 16);
        let stats = render(&scene, &cam, &mut first, &control, &config).unwrap();
        assert_eq!(stats.threads, 1);
        assert_eq!(stats.rows, 16);
        assert!(!stats.cancelled);

        let mut second = FrameBuffer::new(24, 16);
        render(&scene, &cam, &mut second, &control, &config).unwrap();
        assert_eq!(first.as_bytes(), second.as_bytes());

        // Not just background
        let background = to_rgb(scene.background);
        assert!(first.pixels().iter().any(|&p| p != background));
    }

    #[test]
    fn test_parallel_matches_debug() {
        let scene = test_scene();
        let cam = camera(20, 10);
        let control = RenderControl::new();

        let mut serial = FrameBuffer::new(20, 10);
        render(&scene, &cam, &mut serial, &control, &RenderConfig::default().with_debug(true)).unwrap();

        let mut parallel = FrameBuffer::new(20, 10);
        let stats = render(&scene, &cam, &mut parallel, &control, &RenderConfig::default().with_threads(4)).unwrap();
        assert_eq!(stats.threads, 4);
        assert_eq!(stats.rows, 10);
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_frame_size_mismatch() {
        let scene = test_scene();
        let mut frame = FrameBuffer::new(8, 8);
        let control = RenderControl::new();

        let result = render(&scene, &camera(16, 8), &mut frame, &control, &RenderConfig::default());
        assert!(matches!(result, Err(RenderError::FrameSizeMismatch { .. })));
        assert!(!control.is_active());
    }

    #[test]
    fn test_render_rejected_while_active() {
        let scene = test_scene();
        let mut frame = FrameBuffer::new(4, 4);
        let control = RenderControl::new();
        let active = control.begin();
        assert!(active.is_some());

        let result = render(&scene, &camera(4, 4), &mut frame, &control, &RenderConfig::default());
        assert!(matches!(result, Err(RenderError::AlreadyActive)));
        drop(active);
        assert!(!control.is_active());
    }

    /// Shape whose intersection test always panics.
    struct Faulty(ShapeAttributes);

    impl Shape for Faulty {
        fn intersect<'a>(&'a self, _ray: &Ray, _hit: &mut HitRecord<'a>) -> bool {
            panic!("faulty shape");
        }

        fn all_intersect<'a>(&'a self, _ray: &Ray, _hits: &mut Vec<HitRecord<'a>>) {}

        fn is_inside(&self, _p: DVec3) -> bool {
            false
        }

        fn normal(&self, hit: &HitRecord) -> DVec3 {
            hit.n
        }

        fn attributes(&self) -> &ShapeAttributes {
            &self.0
        }

        fn attributes_mut(&mut self) -> &mut ShapeAttributes {
            &mut self.0
        }

        fn name(&self) -> &'static str {
            "faulty"
        }
    }

    #[test]
    fn test_worker_panic_leaves_control_idle() {
        let mut scene = Scene::new();
        scene.add_shape(Box::new(Faulty(ShapeAttributes::default())));
        let mut frame = FrameBuffer::new(4, 4);
        let control = RenderControl::new();
        let config = RenderConfig::default().with_threads(2);

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
            render(&scene, &camera(4, 4), &mut frame, &control, &config)
        }));

        assert!(result.is_err());
        assert!(!control.is_active());
        assert!(control.is_ready_to_finish());
        assert!(control.begin().is_some());
    }

    #[test]
    fn test_worker_count() {
        assert_eq!(RenderConfig::default().with_debug(true).with_threads(8).worker_count(), 1);
        assert_eq!(RenderConfig::default().with_threads(3).worker_count(), 3);
        assert!(RenderConfig::default().worker_count() >= 1);
    }
}
