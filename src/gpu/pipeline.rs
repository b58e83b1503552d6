//! Loads the SPIR-V-equivalent WGSL kernel, builds the descriptor set
//! layout (bind group layout) and compute pipeline, and wires the
//! specialization constant for local workgroup size — the `wgpu`
//! counterpart of `cSetup::PrepareDescriptorSet` / `PrepareComputePipeline`.

use std::borrow::Cow;

use crate::gpu::context::GpuContext;
use crate::gpu::resources::GpuResources;
use crate::gpu::KernelVariant;

/// One push-constant range of a single `u32`, matching `sPushConstantObject`.
pub const PUSH_CONSTANT_SIZE: u32 = 4;

pub struct GpuPipeline {
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub pipeline: wgpu::ComputePipeline,
    pub local_wg_x: u32,
}

impl GpuPipeline {
    pub fn new(ctx: &GpuContext, variant: KernelVariant) -> Self {
        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("ising descriptor set layout"),
                    entries: &[
                        storage_entry(0),
                        storage_entry(1),
                        storage_entry(2),
                        wgpu::BindGroupLayoutEntry {
                            binding: 3,
                            visibility: wgpu::ShaderStages::COMPUTE,
                            ty: wgpu::BindingType::Buffer {
                                ty: wgpu::BufferBindingType::Uniform,
                                has_dynamic_offset: false,
                                min_binding_size: None,
                            },
                            count: None,
                        },
                    ],
                });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("ising pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[wgpu::PushConstantRange {
                    stages: wgpu::ShaderStages::COMPUTE,
                    range: 0..PUSH_CONSTANT_SIZE,
                }],
            });

        let shader_module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(variant.label()),
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(variant.shader_source())),
        });

        // WGSL `override` is the direct equivalent of VkSpecializationInfo's
        // specialization constant 0 (local workgroup size along X).
        let constants = std::collections::HashMap::from([(
            "LOCAL_SIZE_X".to_string(),
            ctx.local_wg_x as f64,
        )]);

        let pipeline = ctx
            .device
            .create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("ising compute pipeline"),
                layout: Some(&pipeline_layout),
                module: &shader_module,
                entry_point: Some("main"),
                compilation_options: wgpu::PipelineCompilationOptions {
                    constants: &constants,
                    ..Default::default()
                },
                cache: None,
            });

        GpuPipeline {
            bind_group_layout,
            pipeline,
            local_wg_x: ctx.local_wg_x,
        }
    }

    /// One workgroup invocation handles one site of the active color, so a
    /// half-sweep dispatch needs `ceil(N / (2 * local_wg_x))` workgroups
    /// (spec §4.7).
    pub fn workgroup_count(&self, ising_n: u32) -> u32 {
        let half_n = ising_n.div_ceil(2);
        half_n.div_ceil(self.local_wg_x)
    }

    pub fn make_bind_group(
        &self,
        ctx: &GpuContext,
        resources: &GpuResources,
    ) -> wgpu::BindGroup {
        ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("ising bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(resources.spin_storage_binding(ctx)),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Buffer(
                        resources.random_numbers_binding(ctx),
                    ),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Buffer(resources.spin_sum_binding(ctx)),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: resources.uniform_buffer().as_entire_binding(),
                },
            ],
        })
    }
}

fn storage_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only: false },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}
