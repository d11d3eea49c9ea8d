//! Scene document reader.
//!
//! The whole document is decoded once at open time into an immutable tree
//! shared by reference count, so object handles stay valid independently of
//! the archive value that produced them.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use flate2::read::GzDecoder;
use tracing::{debug, warn};

use super::format::{decode_sample, ObjectDoc, SceneDocument};
use crate::core::{ArchiveReader, MetaData, ObjectHeader, ObjectReader, TimeSampling};
use crate::geom::{GeomSample, SchemaKind};
use crate::util::{Error, Result};

#[cfg(feature = "mmap")]
use memmap2::Mmap;

/// Gzip stream magic.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Name given to the top object.
const ROOT_NAME: &str = "ABC";

/// Raw file contents.
enum Source {
    #[cfg(feature = "mmap")]
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Source {
    fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound(path.to_path_buf())
            } else {
                Error::Io(e)
            }
        })?;

        #[cfg(feature = "mmap")]
        {
            // Zero-length files cannot be mapped on every platform.
            if file.metadata()?.len() > 0 {
                // SAFETY: the mapping is read-only and dropped before the
                // archive returns; concurrent truncation by another process
                // is outside what a reader can defend against.
                let mmap = unsafe { Mmap::map(&file) }
                    .map_err(|e| Error::MmapFailed(e.to_string()))?;
                return Ok(Source::Mmap(mmap));
            }
        }

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(Source::Owned(bytes))
    }

    fn bytes(&self) -> &[u8] {
        match self {
            #[cfg(feature = "mmap")]
            Source::Mmap(m) => m,
            Source::Owned(v) => v,
        }
    }
}

/// Decoded object, shared by every handle that refers to it.
#[derive(Debug)]
struct ObjectNode {
    header: ObjectHeader,
    valid: bool,
    time_sampling: TimeSampling,
    samples: Vec<GeomSample>,
    children: Vec<Arc<ObjectNode>>,
}

impl ObjectNode {
    fn build(doc: ObjectDoc, header: ObjectHeader, samplings: &[TimeSampling]) -> Self {
        let ObjectDoc { time_sampling, samples, children, .. } = doc;

        let mut valid = true;
        let sampling = match samplings.get(time_sampling) {
            Some(ts) => ts.clone(),
            None => {
                warn!(
                    object = %header.full_name,
                    index = time_sampling,
                    "time sampling index out of range"
                );
                valid = false;
                TimeSampling::IDENTITY
            }
        };

        let kind = SchemaKind::classify(&header);
        let mut decoded = Vec::with_capacity(samples.len());
        for (i, value) in samples.into_iter().enumerate() {
            match decode_sample(kind, value) {
                Ok(Some(sample)) => decoded.push(sample),
                Ok(None) => {}
                Err(e) => {
                    warn!(
                        object = %header.full_name,
                        sample = i,
                        error = %e,
                        "sample does not match schema {:?}",
                        kind
                    );
                    valid = false;
                }
            }
        }

        let children = children
            .into_iter()
            .map(|child| {
                let meta = object_meta_data(&child);
                let child_header = ObjectHeader::child_of(&header.full_name, child.name.clone(), meta);
                Arc::new(ObjectNode::build(child, child_header, samplings))
            })
            .collect();

        Self {
            header,
            valid,
            time_sampling: sampling,
            samples: decoded,
            children,
        }
    }
}

fn object_meta_data(doc: &ObjectDoc) -> MetaData {
    let mut meta: MetaData = doc.metadata.clone().into();
    if let Some(schema) = &doc.schema {
        meta.set_schema(schema);
    }
    meta
}

/// Object handle into a [`DocumentArchive`].
#[derive(Clone, Debug)]
pub struct DocumentObject {
    node: Arc<ObjectNode>,
}

impl ObjectReader for DocumentObject {
    fn header(&self) -> &ObjectHeader {
        &self.node.header
    }

    fn valid(&self) -> bool {
        self.node.valid
    }

    fn num_children(&self) -> usize {
        self.node.children.len()
    }

    fn child_header(&self, index: usize) -> Option<&ObjectHeader> {
        self.node.children.get(index).map(|c| &c.header)
    }

    fn child(&self, index: usize) -> Option<Box<dyn ObjectReader>> {
        self.node
            .children
            .get(index)
            .map(|c| Box::new(DocumentObject { node: Arc::clone(c) }) as Box<dyn ObjectReader>)
    }

    fn time_sampling(&self) -> &TimeSampling {
        &self.node.time_sampling
    }

    fn num_samples(&self) -> usize {
        self.node.samples.len()
    }

    fn read_sample(&self, index: usize) -> Result<GeomSample> {
        self.node
            .samples
            .get(index)
            .cloned()
            .ok_or(Error::SampleOutOfBounds {
                index,
                count: self.node.samples.len(),
            })
    }
}

/// Archive backed by a JSON scene document, optionally gzip-compressed.
#[derive(Debug)]
pub struct DocumentArchive {
    name: String,
    metadata: MetaData,
    time_samplings: Vec<TimeSampling>,
    root: Arc<ObjectNode>,
}

impl DocumentArchive {
    /// Open a scene document from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = Source::open(path)?;
        let archive = Self::from_slice(path.display().to_string(), source.bytes())?;
        debug!(archive = %archive.name, "scene document loaded");
        Ok(archive)
    }

    /// Decode a document from raw bytes (plain or gzip-compressed JSON).
    pub fn from_slice(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let document: SceneDocument = if bytes.starts_with(&GZIP_MAGIC) {
            let mut json = Vec::new();
            GzDecoder::new(bytes).read_to_end(&mut json)?;
            serde_json::from_slice(&json)?
        } else {
            serde_json::from_slice(bytes)?
        };
        Self::from_document(name, document)
    }

    /// Build an archive from an already decoded document.
    pub fn from_document(name: impl Into<String>, document: SceneDocument) -> Result<Self> {
        let SceneDocument { metadata, time_samplings, root } = document;

        let mut samplings = Vec::with_capacity(time_samplings.len() + 1);
        samplings.push(TimeSampling::IDENTITY);
        for (i, doc) in time_samplings.into_iter().enumerate() {
            let ts = TimeSampling::from(doc);
            if !ts.is_well_formed() {
                return Err(Error::invalid(format!("time sampling {} is malformed", i + 1)));
            }
            samplings.push(ts);
        }

        let root_header = ObjectHeader::with_meta_data(ROOT_NAME, "/", object_meta_data(&root));
        let root = Arc::new(ObjectNode::build(root, root_header, &samplings));

        Ok(Self {
            name: name.into(),
            metadata: metadata.into(),
            time_samplings: samplings,
            root,
        })
    }

    /// Application that wrote the document, if recorded.
    pub fn app_name(&self) -> Option<&str> {
        self.metadata.get("_ai_Application")
    }
}

impl ArchiveReader for DocumentArchive {
    fn name(&self) -> &str {
        &self.name
    }

    fn archive_metadata(&self) -> &MetaData {
        &self.metadata
    }

    fn num_time_samplings(&self) -> usize {
        self.time_samplings.len()
    }

    fn time_sampling(&self, index: usize) -> Option<&TimeSampling> {
        self.time_samplings.get(index)
    }

    fn root(&self) -> Box<dyn ObjectReader> {
        Box::new(DocumentObject { node: Arc::clone(&self.root) })
    }
}
