/// Compiler executable substituted for the cross toolchain's one.
pub const DEFAULT_HOST_COMPILER: &str = "c++";
/// Target triple the host analyzer accepts.
pub const DEFAULT_HOST_TARGET: &str = "x86_64-pc-linux-gnu";

/// When to append the host target flag to a cleaned invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFlagPolicy {
    /// Append unconditionally.
    AlwaysAppend,
    /// Append only when the exact token is not already present.
    AppendIfMissing,
}

/// Fake compiler and target substituted into cleaned invocations, so a
/// host-native analyzer accepts what is really a foreign-architecture
/// compile command.
#[derive(Debug, Clone)]
pub struct HostIdentity {
    pub compiler: String,
    pub target_triple: String,
    pub target_policy: TargetFlagPolicy,
}

impl Default for HostIdentity {
    fn default() -> Self {
        Self {
            compiler: DEFAULT_HOST_COMPILER.to_string(),
            target_triple: DEFAULT_HOST_TARGET.to_string(),
            target_policy: TargetFlagPolicy::AppendIfMissing,
        }
    }
}

impl HostIdentity {
    /// Overwrites the compiler executable and makes sure the invocation
    /// carries the host target flag. Empty invocations are left alone.
    pub fn apply(&self, arguments: &mut Vec<String>) {
        let compiler = match arguments.first_mut() {
            Some(compiler) => compiler,
            None => return,
        };
        *compiler = self.compiler.clone();

        let target_flag = format!("--target={}", self.target_triple);
        match self.target_policy {
            TargetFlagPolicy::AlwaysAppend => arguments.push(target_flag),
            TargetFlagPolicy::AppendIfMissing => {
                if !arguments.iter().any(|argument| *argument == target_flag) {
                    arguments.push(target_flag);
                }
            }
        }
    }
}
