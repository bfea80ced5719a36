/// Package ecosystem a component belongs to, derived from its purl type
///
/// The ecosystem decides which artifact naming rule and which repository
/// properties identify a package in the artifact repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    Debian,
    Npm,
    Cargo,
    PyPi,
    Maven,
    NuGet,
    Conan,
    Choco,
    Unknown,
}

impl Ecosystem {
    pub fn from_purl_type(purl_type: &str) -> Self {
        match purl_type.to_lowercase().as_str() {
            "deb" => Ecosystem::Debian,
            "npm" => Ecosystem::Npm,
            "cargo" => Ecosystem::Cargo,
            "pypi" => Ecosystem::PyPi,
            "maven" => Ecosystem::Maven,
            "nuget" => Ecosystem::NuGet,
            "conan" => Ecosystem::Conan,
            "choco" | "chocolatey" => Ecosystem::Choco,
            _ => Ecosystem::Unknown,
        }
    }

    /// Repository property keys `(name, version)` that identify a package
    /// exactly, when the repository exposes them.
    pub fn identity_properties(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Ecosystem::Debian => Some(("deb.name", "deb.version")),
            Ecosystem::Npm => Some(("npm.name", "npm.version")),
            Ecosystem::Cargo => Some(("crate.name", "crate.version")),
            Ecosystem::PyPi => Some(("pypi.normalized.name", "pypi.version")),
            Ecosystem::NuGet | Ecosystem::Choco => Some(("nuget.id", "nuget.version")),
            Ecosystem::Conan => Some(("conan.package.name", "conan.package.version")),
            Ecosystem::Maven | Ecosystem::Unknown => None,
        }
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Ecosystem::Debian => "debian",
            Ecosystem::Npm => "npm",
            Ecosystem::Cargo => "cargo",
            Ecosystem::PyPi => "pypi",
            Ecosystem::Maven => "maven",
            Ecosystem::NuGet => "nuget",
            Ecosystem::Conan => "conan",
            Ecosystem::Choco => "choco",
            Ecosystem::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}
