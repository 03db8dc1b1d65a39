pub mod harvester;
pub mod pipeline;
pub mod settings;
pub mod templates;
pub mod transformer;
pub mod xml;

pub use harvester::{download, HarvestStats, QueryService};
pub use pipeline::{stage_dirs, Pipeline, Step, WriterTarget};
pub use settings::Settings;
pub use templates::TemplateStore;
pub use transformer::{
    tag_attribute, tag_value, transform, transform_element, TagValue, TransformStats,
};
pub use xml::{parse_snapshot, Element, Node, XmlError};
